//! Pure read-side projections over a snapshot of per-user totals.
//!
//! Both functions are recomputed fresh on every call; nothing here caches or
//! maintains state between calls. Ordering is fully deterministic for a fixed
//! snapshot: points decide first, user id breaks ties.

use uuid::Uuid;

use crate::api::{NextRival, RankedUser};

/// One candidate row fed into the ranking functions, already joined to a
/// display name by the caller.
#[derive(Debug, Clone)]
pub struct Standing {
    pub user_id: Uuid,
    pub name: String,
    pub total_points: i64,
}

/// Orders standings into leaderboard rows: points descending, user id
/// ascending on ties. Ranks are 1-based, contiguous, and distinct even for
/// equal scores. An empty snapshot produces an empty board.
pub fn rank(mut standings: Vec<Standing>, viewer: Uuid) -> Vec<RankedUser> {
    standings.sort_by(|a, b| {
        b.total_points
            .cmp(&a.total_points)
            .then_with(|| a.user_id.cmp(&b.user_id))
    });

    standings
        .into_iter()
        .enumerate()
        .map(|(i, s)| RankedUser {
            rank: i as u32 + 1,
            is_viewer: s.user_id == viewer,
            user_id: s.user_id,
            name: s.name,
            total_points: s.total_points,
        })
        .collect()
}

/// Finds the candidate with the smallest total strictly greater than
/// `own_points`. Ties on the qualifying score resolve to the lowest user id
/// so the result is reproducible for a fixed snapshot. `None` when nobody is
/// ahead.
pub fn next_rival(own_points: i64, candidates: &[Standing]) -> Option<NextRival> {
    candidates
        .iter()
        .filter(|c| c.total_points > own_points)
        .min_by(|a, b| {
            a.total_points
                .cmp(&b.total_points)
                .then_with(|| a.user_id.cmp(&b.user_id))
        })
        .map(|c| NextRival {
            name: c.name.clone(),
            points_diff: c.total_points - own_points,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn uid(n: u8) -> Uuid {
        Uuid::from_bytes([n; 16])
    }

    fn standing(n: u8, name: &str, points: i64) -> Standing {
        Standing {
            user_id: uid(n),
            name: name.to_string(),
            total_points: points,
        }
    }

    #[test]
    fn leaderboard_orders_by_points_descending() {
        let rows = rank(
            vec![
                standing(1, "alice", 30),
                standing(2, "bob", 50),
                standing(3, "carol", 35),
            ],
            uid(1),
        );

        let order: Vec<_> = rows
            .iter()
            .map(|r| (r.rank, r.name.as_str(), r.total_points))
            .collect();
        assert_eq!(order, vec![(1, "bob", 50), (2, "carol", 35), (3, "alice", 30)]);
    }

    #[test]
    fn leaderboard_marks_viewer_row() {
        let rows = rank(vec![standing(1, "alice", 30), standing(2, "bob", 50)], uid(1));
        assert!(!rows[0].is_viewer);
        assert!(rows[1].is_viewer);
    }

    #[test]
    fn leaderboard_ties_get_distinct_sequential_ranks() {
        let rows = rank(
            vec![
                standing(3, "carol", 20),
                standing(1, "alice", 20),
                standing(2, "bob", 20),
            ],
            uid(9),
        );

        assert_eq!(
            rows.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        // Ties resolve by user id ascending.
        assert_eq!(
            rows.iter().map(|r| r.user_id).collect::<Vec<_>>(),
            vec![uid(1), uid(2), uid(3)]
        );
    }

    #[test]
    fn leaderboard_of_empty_population_is_empty() {
        assert!(rank(Vec::new(), uid(1)).is_empty());
    }

    #[test]
    fn next_rival_picks_closest_score_above_own() {
        let friends = [standing(2, "bob", 50), standing(3, "carol", 35)];
        let rival = next_rival(30, &friends).unwrap();
        assert_eq!(rival.name, "carol");
        assert_eq!(rival.points_diff, 5);
    }

    #[test]
    fn next_rival_ignores_equal_and_lower_scores() {
        let friends = [standing(2, "bob", 30), standing(3, "carol", 10)];
        assert_eq!(next_rival(30, &friends), None);
    }

    #[test]
    fn next_rival_none_without_candidates() {
        assert_eq!(next_rival(0, &[]), None);
    }

    #[test]
    fn next_rival_tie_resolves_to_lowest_user_id() {
        let friends = [standing(7, "gina", 40), standing(2, "bob", 40)];
        let rival = next_rival(30, &friends).unwrap();
        assert_eq!(rival.name, "bob");
        assert_eq!(rival.points_diff, 10);
    }
}
