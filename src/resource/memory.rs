//! In-memory repository used by service and router tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::repository::ResourceRepository;
use crate::error::{AppError, AppResult};

struct Row<In> {
    id: i64,
    input: In,
    deleted: bool,
}

pub struct MemoryRepository<Rec, In> {
    rows: Mutex<Vec<Row<In>>>,
    render: fn(i64, &In) -> Rec,
    parent_key: Option<fn(&In) -> i64>,
}

impl<Rec, In> MemoryRepository<Rec, In> {
    pub fn new(render: fn(i64, &In) -> Rec) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            render,
            parent_key: None,
        }
    }

    /// Enables `fetch_by_parent` grouped by the given key.
    pub fn with_parent_key(mut self, parent_key: fn(&In) -> i64) -> Self {
        self.parent_key = Some(parent_key);
        self
    }
}

#[async_trait]
impl<Rec, In> ResourceRepository for MemoryRepository<Rec, In>
where
    Rec: Send + Sync + 'static,
    In: Send + 'static,
{
    type Record = Rec;
    type Input = In;

    async fn create(&self, input: In) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let id = rows.len() as i64 + 1;
        rows.push(Row {
            id,
            input,
            deleted: false,
        });
        Ok(())
    }

    async fn fetch_all(&self) -> AppResult<Vec<Rec>> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|r| !r.deleted)
            .map(|r| (self.render)(r.id, &r.input))
            .collect())
    }

    async fn fetch_by_id(&self, id: i64) -> AppResult<Rec> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .find(|r| r.id == id && !r.deleted)
            .map(|r| (self.render)(r.id, &r.input))
            .ok_or(AppError::NotFound)
    }

    async fn edit_by_id(&self, id: i64, input: In) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && !r.deleted)
            .ok_or(AppError::NotFound)?;
        row.input = input;
        Ok(())
    }

    async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        let mut rows = self.rows.lock().unwrap();
        let row = rows
            .iter_mut()
            .find(|r| r.id == id && !r.deleted)
            .ok_or(AppError::NotFound)?;
        row.deleted = true;
        Ok(())
    }

    async fn fetch_by_parent(&self, parent_id: i64) -> AppResult<Vec<Rec>> {
        let Some(parent_key) = self.parent_key else {
            return Err(AppError::Unimplemented("fetch by parent"));
        };
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .rev()
            .filter(|r| !r.deleted && parent_key(&r.input) == parent_id)
            .map(|r| (self.render)(r.id, &r.input))
            .collect())
    }
}
