//! Categories: a one-level name/slug hierarchy.
//!
//! # Invariants
//! - A category must not be its own parent, and re-parenting must not form a
//!   cycle (only one level is exercised, but nothing here assumes depth).
//! - A name is unique among siblings sharing the same `parent_id`; the
//!   top level (no parent) is its own sibling set.

use serde::{Deserialize, Serialize};

use promostore_core::{CategoryId, DomainError, DomainResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub slug: String,
    pub parent_id: Option<CategoryId>,
}

/// Input for creating a category. The slug is derived, not supplied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCategory {
    pub name: String,
    pub parent_id: Option<CategoryId>,
}

impl NewCategory {
    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("category name cannot be empty"));
        }
        Ok(())
    }
}

/// Field updates for an existing category.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUpdate {
    pub name: Option<String>,
    /// `Some(None)` moves the category to the top level.
    pub parent_id: Option<Option<CategoryId>>,
}

/// URL slug for a category name: lowercased, runs of non-alphanumerics
/// collapsed to a single `-`, trimmed of leading/trailing dashes.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.chars() {
        if c.is_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.extend(c.to_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Enforce sibling-name uniqueness.
///
/// `exclude` skips the category's own row when re-checking during a rename.
/// Comparison is exact; no write may happen when this fails.
pub fn ensure_unique_sibling(
    name: &str,
    parent_id: Option<CategoryId>,
    existing: &[Category],
    exclude: Option<CategoryId>,
) -> DomainResult<()> {
    let duplicate = existing.iter().any(|c| {
        c.parent_id == parent_id && c.name == name && Some(c.id) != exclude
    });
    if duplicate {
        return Err(DomainError::conflict(format!(
            "a category named {name:?} already exists at this level"
        )));
    }
    Ok(())
}

/// Reject self-parenting and cycles when assigning `parent_id` to `id`.
pub fn ensure_acyclic_parent(
    id: CategoryId,
    parent_id: Option<CategoryId>,
    existing: &[Category],
) -> DomainResult<()> {
    let mut current = parent_id;
    let mut hops = 0usize;
    while let Some(p) = current {
        if p == id {
            return Err(DomainError::invariant(
                "category parent must not form a cycle",
            ));
        }
        hops += 1;
        if hops > existing.len() {
            // Pre-existing corruption; refuse rather than loop.
            return Err(DomainError::invariant("category tree contains a cycle"));
        }
        current = existing.iter().find(|c| c.id == p).and_then(|c| c.parent_id);
    }
    Ok(())
}

/// A top-level category with its (single level of) children, for the public
/// catalog tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(flatten)]
    pub category: Category,
    pub children: Vec<Category>,
}

/// Assemble the public tree: top-level categories with nested children,
/// both levels sorted by name.
pub fn build_tree(mut categories: Vec<Category>) -> Vec<CategoryNode> {
    categories.sort_by(|a, b| a.name.cmp(&b.name));
    let (roots, children): (Vec<_>, Vec<_>) =
        categories.into_iter().partition(|c| c.parent_id.is_none());

    roots
        .into_iter()
        .map(|root| {
            let children = children
                .iter()
                .filter(|c| c.parent_id == Some(root.id))
                .cloned()
                .collect();
            CategoryNode {
                category: root,
                children,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cat(name: &str, parent_id: Option<CategoryId>) -> Category {
        Category {
            id: CategoryId::new(),
            name: name.into(),
            slug: slugify(name),
            parent_id,
        }
    }

    #[test]
    fn slugs_are_lowercase_dashed() {
        assert_eq!(slugify("Coffee Mugs"), "coffee-mugs");
        assert_eq!(slugify("T-Shirts & Polos"), "t-shirts-polos");
        assert_eq!(slugify("  Pens  "), "pens");
    }

    #[test]
    fn duplicate_sibling_name_is_a_conflict() {
        let existing = vec![cat("Mugs", None), cat("Pens", None)];
        let err = ensure_unique_sibling("Mugs", None, &existing, None).unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[test]
    fn same_name_under_a_different_parent_is_allowed() {
        let parent = cat("Drinkware", None);
        let existing = vec![parent.clone(), cat("Classic", Some(parent.id))];
        // "Classic" at the top level does not clash with "Classic" under Drinkware.
        assert!(ensure_unique_sibling("Classic", None, &existing, None).is_ok());
    }

    #[test]
    fn rename_excludes_own_row() {
        let a = cat("Mugs", None);
        let existing = vec![a.clone(), cat("Pens", None)];
        assert!(ensure_unique_sibling("Mugs", None, &existing, Some(a.id)).is_ok());
        assert!(ensure_unique_sibling("Pens", None, &existing, Some(a.id)).is_err());
    }

    #[test]
    fn self_parenting_is_rejected() {
        let a = cat("Mugs", None);
        let existing = vec![a.clone()];
        assert!(ensure_acyclic_parent(a.id, Some(a.id), &existing).is_err());
    }

    #[test]
    fn two_node_cycle_is_rejected() {
        let a = cat("Mugs", None);
        let b = cat("Espresso", Some(a.id));
        let existing = vec![a.clone(), b.clone()];
        // Re-parenting a under b would make a -> b -> a.
        assert!(ensure_acyclic_parent(a.id, Some(b.id), &existing).is_err());
    }

    #[test]
    fn tree_groups_children_under_roots() {
        let drinkware = cat("Drinkware", None);
        let office = cat("Office", None);
        let mugs = cat("Mugs", Some(drinkware.id));
        let bottles = cat("Bottles", Some(drinkware.id));

        let tree = build_tree(vec![office.clone(), mugs, bottles, drinkware.clone()]);
        assert_eq!(tree.len(), 2);
        assert_eq!(tree[0].category.name, "Drinkware");
        let child_names: Vec<_> = tree[0].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(child_names, ["Bottles", "Mugs"]);
        assert!(tree[1].children.is_empty());
    }
}
