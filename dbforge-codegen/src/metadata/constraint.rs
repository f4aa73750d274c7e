//! Foreign key constraint metadata

use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};

/// A foreign key column linking `fk_table.fk_column` to `pk_table.pk_column`.
///
/// Equality and hashing ignore the constraint name: two constraints linking
/// the same columns are the same constraint for scripting purposes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SqlConstraint {
    pub name: String,
    pub fk_table: String,
    pub fk_column: String,
    pub pk_table: String,
    pub pk_column: String,
}

impl SqlConstraint {
    fn key(&self) -> (&str, &str, &str, &str) {
        (&self.fk_table, &self.fk_column, &self.pk_table, &self.pk_column)
    }

    /// Whether this constraint references `table` on either side.
    pub fn involves(&self, table: &str) -> bool {
        self.fk_table == table || self.pk_table == table
    }
}

impl PartialEq for SqlConstraint {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for SqlConstraint {}

impl Hash for SqlConstraint {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn fk(name: &str) -> SqlConstraint {
        SqlConstraint {
            name: name.to_string(),
            fk_table: "Score".to_string(),
            fk_column: "GameId".to_string(),
            pk_table: "Game".to_string(),
            pk_column: "Id".to_string(),
        }
    }

    #[test]
    fn test_equality_ignores_name() {
        assert_eq!(fk("FK_A"), fk("FK_B"));
        let mut other = fk("FK_A");
        other.pk_column = "Code".to_string();
        assert_ne!(fk("FK_A"), other);
    }

    #[test]
    fn test_dedup_in_set() {
        let set: HashSet<SqlConstraint> = [fk("FK_A"), fk("FK_B")].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_involves() {
        assert!(fk("x").involves("Game"));
        assert!(fk("x").involves("Score"));
        assert!(!fk("x").involves("Player"));
    }
}
