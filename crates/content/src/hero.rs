//! Hero carousel images.
//!
//! Ordering is the explicit `sort_order` field, not insertion order. A
//! reorder is a full rewrite of every listed row's `sort_order`; concurrent
//! reorders are last-write-wins (no version counter).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use promostore_core::{DomainError, DomainResult, HeroImageId};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeroImage {
    pub id: HeroImageId,
    pub url: String,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
}

/// Turn an ordered id list into `(id, sort_order)` assignments, index as
/// order. Rejects duplicate ids and ids that don't exist; ids absent from the
/// list keep their previous `sort_order`.
pub fn order_assignments(
    ids: &[HeroImageId],
    existing: &[HeroImage],
) -> DomainResult<Vec<(HeroImageId, i32)>> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if seen.contains(id) {
            return Err(DomainError::validation(format!(
                "hero image {id} listed twice in reorder"
            )));
        }
        if !existing.iter().any(|img| img.id == *id) {
            return Err(DomainError::not_found());
        }
        seen.push(*id);
    }

    Ok(ids
        .iter()
        .enumerate()
        .map(|(index, id)| (*id, index as i32))
        .collect())
}

/// Sort images for display: `sort_order` ascending, ties broken by
/// `created_at` so freshly appended images land last deterministically.
pub fn sorted_for_display(mut images: Vec<HeroImage>) -> Vec<HeroImage> {
    images.sort_by(|a, b| {
        a.sort_order
            .cmp(&b.sort_order)
            .then(a.created_at.cmp(&b.created_at))
    });
    images
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str, sort_order: i32) -> HeroImage {
        HeroImage {
            id: HeroImageId::new(),
            url: url.into(),
            sort_order,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn assignments_follow_list_index() {
        let a = image("a.jpg", 0);
        let b = image("b.jpg", 1);
        let c = image("c.jpg", 2);
        let existing = vec![a.clone(), b.clone(), c.clone()];

        let plan = order_assignments(&[c.id, a.id, b.id], &existing).unwrap();
        assert_eq!(plan, vec![(c.id, 0), (a.id, 1), (b.id, 2)]);
    }

    #[test]
    fn ids_left_out_of_a_reorder_get_no_assignment() {
        let a = image("a.jpg", 0);
        let b = image("b.jpg", 1);
        let c = image("c.jpg", 2);
        let existing = vec![a.clone(), b.clone(), c.clone()];

        // A partial list only rewrites the listed rows; a keeps its old order.
        let plan = order_assignments(&[c.id, b.id], &existing).unwrap();
        assert_eq!(plan, vec![(c.id, 0), (b.id, 1)]);
        assert!(plan.iter().all(|(id, _)| *id != a.id));
    }

    #[test]
    fn duplicate_id_in_reorder_is_rejected() {
        let a = image("a.jpg", 0);
        let existing = vec![a.clone()];
        assert!(order_assignments(&[a.id, a.id], &existing).is_err());
    }

    #[test]
    fn unknown_id_in_reorder_is_not_found() {
        let a = image("a.jpg", 0);
        let existing = vec![a];
        let err = order_assignments(&[HeroImageId::new()], &existing).unwrap_err();
        assert_eq!(err, DomainError::NotFound);
    }

    #[test]
    fn display_sort_is_by_sort_order() {
        let a = image("a.jpg", 2);
        let b = image("b.jpg", 0);
        let c = image("c.jpg", 1);
        let sorted = sorted_for_display(vec![a, b, c]);
        let urls: Vec<_> = sorted.iter().map(|i| i.url.as_str()).collect();
        assert_eq!(urls, ["b.jpg", "c.jpg", "a.jpg"]);
    }
}
