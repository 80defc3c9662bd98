//! Category tree structures for hierarchical display.

use serde::{Deserialize, Serialize};

use super::model::Category;

/// A top-level category with its direct children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryNode {
    /// The top-level category.
    #[serde(flatten)]
    pub category: Category,
    /// Child categories, in input order.
    pub children: Vec<Category>,
}

/// The two-level category tree used for browsing and filtering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTree {
    /// Top-level categories with their children.
    pub roots: Vec<CategoryNode>,
    /// Children whose `parent_id` matches no top-level category.
    pub orphans: Vec<Category>,
}

impl CategoryTree {
    /// Create an empty tree.
    pub fn empty() -> Self {
        Self {
            roots: Vec::new(),
            orphans: Vec::new(),
        }
    }

    /// Partition categories into parents and children and group each child
    /// under the parent whose id matches its `parent_id`.
    ///
    /// Linear scan per parent; catalogs hold tens to low hundreds of
    /// categories.
    pub fn build(categories: &[Category]) -> Self {
        let (parents, children): (Vec<&Category>, Vec<&Category>) =
            categories.iter().partition(|c| c.is_top_level());

        let roots: Vec<CategoryNode> = parents
            .into_iter()
            .map(|parent| CategoryNode {
                category: parent.clone(),
                children: children
                    .iter()
                    .filter(|child| child.parent_id == Some(parent.id))
                    .map(|child| (*child).clone())
                    .collect(),
            })
            .collect();

        let orphans = children
            .into_iter()
            .filter(|child| !roots.iter().any(|root| Some(root.category.id) == child.parent_id))
            .cloned()
            .collect();

        Self { roots, orphans }
    }

    /// Total number of categories in the tree.
    pub fn len(&self) -> usize {
        self.roots.iter().map(|r| 1 + r.children.len()).sum::<usize>() + self.orphans.len()
    }

    /// Whether the tree holds no categories.
    pub fn is_empty(&self) -> bool {
        self.roots.is_empty() && self.orphans.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn category(name: &str, parent_id: Option<Uuid>) -> Category {
        Category {
            id: Uuid::new_v4(),
            name: name.to_string(),
            parent_id,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_groups_children_under_parents() {
        let valves = category("Valves", None);
        let pumps = category("Pumps", None);
        let ball = category("Ball Valves", Some(valves.id));
        let gate = category("Gate Valves", Some(valves.id));
        let input = vec![ball.clone(), gate.clone(), pumps.clone(), valves.clone()];

        let tree = CategoryTree::build(&input);

        assert_eq!(tree.roots.len(), 2);
        assert_eq!(tree.roots[0].category, pumps);
        assert!(tree.roots[0].children.is_empty());
        assert_eq!(tree.roots[1].category, valves);
        assert_eq!(tree.roots[1].children, vec![ball, gate]);
        assert!(tree.orphans.is_empty());
        assert_eq!(tree.len(), 4);
    }

    #[test]
    fn test_orphans_are_kept() {
        let stray = category("Stray", Some(Uuid::new_v4()));
        let tree = CategoryTree::build(std::slice::from_ref(&stray));
        assert!(tree.roots.is_empty());
        assert_eq!(tree.orphans, vec![stray]);
        assert!(!tree.is_empty());
    }

    #[test]
    fn test_empty() {
        assert!(CategoryTree::build(&[]).is_empty());
        assert_eq!(CategoryTree::empty().len(), 0);
    }
}
