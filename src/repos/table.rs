/*
 * Responsibility
 * - 1 テーブル分の in-memory 行ストア (auto-increment id)
 * - 読み書きは parking_lot::RwLock で直列化する
 * - 条件付き insert / update を lock 内で行い、check-then-act の競合を防ぐ
 */
use std::collections::BTreeMap;

use parking_lot::RwLock;

use super::error::RepoError;

#[derive(Debug)]
struct Inner<T> {
    next_id: i64,
    rows: BTreeMap<i64, T>,
}

#[derive(Debug)]
pub struct Table<T> {
    inner: RwLock<Inner<T>>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(Inner {
                next_id: 1,
                rows: BTreeMap::new(),
            }),
        }
    }
}

impl<T: Clone> Table<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates the next id and stores the row `build` makes from it.
    pub fn insert_with<F>(&self, build: F) -> T
    where
        F: FnOnce(i64) -> T,
    {
        let mut inner = self.inner.write();
        let id = inner.next_id;
        inner.next_id += 1;

        let row = build(id);
        inner.rows.insert(id, row.clone());
        row
    }

    /// Like `insert_with`, but refuses when any existing row matches `clash`.
    pub fn insert_unique<P, F>(&self, clash: P, build: F) -> Result<T, RepoError>
    where
        P: Fn(&T) -> bool,
        F: FnOnce(i64) -> T,
    {
        let mut inner = self.inner.write();
        if inner.rows.values().any(clash) {
            return Err(RepoError::Conflict);
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let row = build(id);
        inner.rows.insert(id, row.clone());
        Ok(row)
    }

    /// Returns the first row matching `pred`, inserting one if none does.
    pub fn find_or_insert<P, F>(&self, pred: P, build: F) -> T
    where
        P: Fn(&T) -> bool,
        F: FnOnce(i64) -> T,
    {
        let mut inner = self.inner.write();
        if let Some(found) = inner.rows.values().find(|row| pred(row)) {
            return found.clone();
        }

        let id = inner.next_id;
        inner.next_id += 1;

        let row = build(id);
        inner.rows.insert(id, row.clone());
        row
    }

    pub fn get(&self, id: i64) -> Option<T> {
        self.inner.read().rows.get(&id).cloned()
    }

    /// Mutates one row in place. `None` when the id doesn't exist.
    pub fn update<R, F>(&self, id: i64, apply: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.inner.write().rows.get_mut(&id).map(apply)
    }

    /// Like `update`, but refuses when any *other* row matches `clash`.
    pub fn update_unique<P, R, F>(&self, id: i64, clash: P, apply: F) -> Result<Option<R>, RepoError>
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T) -> R,
    {
        let mut inner = self.inner.write();
        if !inner.rows.contains_key(&id) {
            return Ok(None);
        }
        if inner.rows.iter().any(|(other, row)| *other != id && clash(row)) {
            return Err(RepoError::Conflict);
        }

        Ok(inner.rows.get_mut(&id).map(apply))
    }

    pub fn delete(&self, id: i64) -> Option<T> {
        self.inner.write().rows.remove(&id)
    }

    /// Deletes every row matching `pred` and returns how many went.
    pub fn delete_where<P>(&self, pred: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        let mut inner = self.inner.write();
        let before = inner.rows.len();
        inner.rows.retain(|_, row| !pred(row));
        before - inner.rows.len()
    }

    pub fn find<P>(&self, pred: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.inner.read().rows.values().find(|row| pred(row)).cloned()
    }

    /// Matching rows in id order.
    pub fn filter<P>(&self, pred: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.inner
            .read()
            .rows
            .values()
            .filter(|row| pred(row))
            .cloned()
            .collect()
    }

    pub fn all(&self) -> Vec<T> {
        self.inner.read().rows.values().cloned().collect()
    }

    pub fn count<P>(&self, pred: P) -> usize
    where
        P: Fn(&T) -> bool,
    {
        self.inner.read().rows.values().filter(|row| pred(row)).count()
    }

    pub fn len(&self) -> usize {
        self.inner.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: i64,
        name: &'static str,
    }

    #[test]
    fn ids_auto_increment_and_are_never_reused() {
        let table = Table::new();
        let a = table.insert_with(|id| Row { id, name: "a" });
        let b = table.insert_with(|id| Row { id, name: "b" });
        assert_eq!((a.id, b.id), (1, 2));

        table.delete(b.id);
        let c = table.insert_with(|id| Row { id, name: "c" });
        assert_eq!(c.id, 3);
    }

    #[test]
    fn insert_unique_rejects_clashes() {
        let table = Table::new();
        table
            .insert_unique(|r: &Row| r.name == "x", |id| Row { id, name: "x" })
            .unwrap();

        let again = table.insert_unique(|r: &Row| r.name == "x", |id| Row { id, name: "x" });
        assert!(matches!(again, Err(RepoError::Conflict)));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn find_or_insert_returns_the_existing_row() {
        let table = Table::new();
        let first = table.find_or_insert(|r: &Row| r.name == "t", |id| Row { id, name: "t" });
        let second = table.find_or_insert(|r: &Row| r.name == "t", |id| Row { id, name: "t" });
        assert_eq!(first, second);
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn update_and_delete_where() {
        let table = Table::new();
        for name in ["a", "b", "a"] {
            table.insert_with(|id| Row { id, name });
        }

        assert_eq!(table.update(2, |r| { r.name = "z"; r.id }), Some(2));
        assert_eq!(table.update(99, |r| r.id), None);
        assert_eq!(table.get(2).unwrap().name, "z");

        assert_eq!(table.delete_where(|r| r.name == "a"), 2);
        assert_eq!(table.all(), vec![Row { id: 2, name: "z" }]);
    }
}
