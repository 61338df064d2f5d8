// crates/countries-core/src/store/memory.rs

//! In-memory stand-in for the database.
//!
//! Not `#[cfg(test)]`: the demos and downstream tests use it for dry runs.
//! Rows are upserted on `common_name`, mirroring the shipped DML template;
//! the template text itself is only recorded.

use super::{Connect, CountryTable, Database};
use crate::error::{EtlError, Result};
use crate::row::FlatCountryRow;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Default)]
struct MemoryState {
    statements: Vec<String>,
    rows: Vec<FlatCountryRow>,
    commits: usize,
}

/// Shared handle; clones see the same tables.
#[derive(Debug, Clone, Default)]
pub struct MemoryDatabase {
    state: Rc<RefCell<MemoryState>>,
}

impl MemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    /// Committed rows, in insertion order.
    pub fn rows(&self) -> Vec<FlatCountryRow> {
        self.state.borrow().rows.clone()
    }

    /// Committed DDL/DML texts, in execution order.
    pub fn statements(&self) -> Vec<String> {
        self.state.borrow().statements.clone()
    }

    pub fn commits(&self) -> usize {
        self.state.borrow().commits
    }
}

/// Staged work; dropped without commit means rolled back.
#[derive(Debug)]
pub struct MemoryTransaction<'a> {
    db: &'a MemoryDatabase,
    statements: Vec<String>,
    staged: Vec<FlatCountryRow>,
}

impl Database for MemoryDatabase {
    type Tx<'a> = MemoryTransaction<'a>;

    fn transaction(&mut self) -> Result<MemoryTransaction<'_>> {
        Ok(MemoryTransaction {
            db: self,
            statements: Vec::new(),
            staged: Vec::new(),
        })
    }
}

impl CountryTable for MemoryTransaction<'_> {
    fn ensure_table(&mut self, ddl: &str) -> Result<()> {
        self.statements.push(ddl.to_string());
        Ok(())
    }

    fn bulk_insert(&mut self, dml: &str, rows: &[FlatCountryRow]) -> Result<u64> {
        self.statements.push(dml.to_string());
        self.staged.extend_from_slice(rows);
        Ok(rows.len() as u64)
    }

    fn commit(self) -> Result<()> {
        let mut state = self.db.state.borrow_mut();
        state.statements.extend(self.statements);
        for row in self.staged {
            let existing = state
                .rows
                .iter()
                .position(|r| r.common_name.is_some() && r.common_name == row.common_name);
            match existing {
                Some(i) => state.rows[i] = row,
                None => state.rows.push(row),
            }
        }
        state.commits += 1;
        Ok(())
    }
}

/// Hands out handles to one [`MemoryDatabase`], counting attempts.
#[derive(Debug, Default)]
pub struct MemoryConnector {
    db: MemoryDatabase,
    attempts: Cell<usize>,
    unreachable: bool,
}

impl MemoryConnector {
    pub fn new(db: MemoryDatabase) -> Self {
        Self {
            db,
            attempts: Cell::new(0),
            unreachable: false,
        }
    }

    /// A connector whose every attempt fails like a refused connection.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    pub fn attempts(&self) -> usize {
        self.attempts.get()
    }
}

impl Connect for MemoryConnector {
    type Conn = MemoryDatabase;

    fn connect(&self) -> Result<MemoryDatabase> {
        self.attempts.set(self.attempts.get() + 1);
        if self.unreachable {
            return Err(EtlError::ConnectionFailure {
                target: "memory".to_string(),
                source: "connection refused".into(),
            });
        }
        Ok(self.db.clone())
    }
}
