use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use super::repository::ResourceRepository;
use crate::error::AppResult;

/// Confirms that a referenced parent row is live.
#[async_trait]
pub trait ParentLookup: Send + Sync {
    async fn ensure_live(&self, id: i64) -> AppResult<()>;
}

#[async_trait]
impl<R> ParentLookup for R
where
    R: ResourceRepository,
{
    async fn ensure_live(&self, id: i64) -> AppResult<()> {
        self.fetch_by_id(id).await.map(|_| ())
    }
}

/// Write inputs that point at a parent row.
pub trait ParentRef {
    fn parent_id(&self) -> Option<i64> {
        None
    }
}

type DynRepository<Rec, In> = dyn ResourceRepository<Record = Rec, Input = In>;

pub struct ResourceService<Rec, In> {
    repo: Arc<DynRepository<Rec, In>>,
    parent: Option<Arc<dyn ParentLookup>>,
}

impl<Rec, In> ResourceService<Rec, In>
where
    Rec: Send + 'static,
    In: ParentRef + Send + 'static,
{
    pub fn new(repo: Arc<DynRepository<Rec, In>>) -> Self {
        Self { repo, parent: None }
    }

    /// `create` and `edit_by_id` will first require the input's parent to be live.
    pub fn with_parent(repo: Arc<DynRepository<Rec, In>>, parent: Arc<dyn ParentLookup>) -> Self {
        Self {
            repo,
            parent: Some(parent),
        }
    }

    async fn check_parent(&self, input: &In) -> AppResult<()> {
        if let (Some(parent), Some(parent_id)) = (&self.parent, input.parent_id()) {
            debug!(parent_id, "checking parent");
            parent.ensure_live(parent_id).await?;
        }
        Ok(())
    }

    pub async fn create(&self, input: In) -> AppResult<()> {
        self.check_parent(&input).await?;
        self.repo.create(input).await
    }

    pub async fn fetch_all(&self) -> AppResult<Vec<Rec>> {
        self.repo.fetch_all().await
    }

    pub async fn fetch_by_id(&self, id: i64) -> AppResult<Rec> {
        self.repo.fetch_by_id(id).await
    }

    pub async fn edit_by_id(&self, id: i64, input: In) -> AppResult<()> {
        self.check_parent(&input).await?;
        self.repo.edit_by_id(id, input).await
    }

    pub async fn delete_by_id(&self, id: i64) -> AppResult<()> {
        self.repo.delete_by_id(id).await
    }

    pub async fn fetch_by_parent(&self, parent_id: i64) -> AppResult<Vec<Rec>> {
        self.repo.fetch_by_parent(parent_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{error::AppError, resource::memory::MemoryRepository};

    #[derive(Debug, Clone)]
    struct Parent {
        name: String,
    }
    impl ParentRef for Parent {}

    #[derive(Debug, Clone)]
    struct Child {
        parent_id: i64,
        body: String,
    }
    impl ParentRef for Child {
        fn parent_id(&self) -> Option<i64> {
            Some(self.parent_id)
        }
    }

    type ParentRepo = MemoryRepository<(i64, String), Parent>;
    type ChildRepo = MemoryRepository<(i64, String), Child>;

    fn parents() -> Arc<ParentRepo> {
        Arc::new(MemoryRepository::new(|id, p: &Parent| (id, p.name.clone())))
    }

    fn children() -> Arc<ChildRepo> {
        Arc::new(
            MemoryRepository::new(|id, c: &Child| (id, c.body.clone()))
                .with_parent_key(|c: &Child| c.parent_id),
        )
    }

    fn child(parent_id: i64, body: &str) -> Child {
        Child {
            parent_id,
            body: body.into(),
        }
    }

    #[tokio::test]
    async fn child_create_requires_live_parent() {
        let parents = parents();
        let children = children();
        let svc = ResourceService::with_parent(children.clone(), parents.clone());

        let err = svc.create(child(99, "orphan")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
        assert!(children.fetch_all().await.unwrap().is_empty());

        parents.create(Parent { name: "web".into() }).await.unwrap();
        svc.create(child(1, "kept")).await.unwrap();
        assert_eq!(svc.fetch_all().await.unwrap(), vec![(1, "kept".to_string())]);
    }

    #[tokio::test]
    async fn child_edit_rejects_deleted_parent() {
        let parents = parents();
        let children = children();
        let svc = ResourceService::with_parent(children.clone(), parents.clone());

        parents.create(Parent { name: "a".into() }).await.unwrap();
        parents.create(Parent { name: "b".into() }).await.unwrap();
        svc.create(child(1, "v1")).await.unwrap();
        parents.delete_by_id(2).await.unwrap();

        let err = svc.edit_by_id(1, child(2, "v2")).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
        assert_eq!(svc.fetch_by_id(1).await.unwrap().1, "v1");
    }

    #[tokio::test]
    async fn reads_and_deletes_ignore_the_parent() {
        let parents = parents();
        let children = children();
        parents.create(Parent { name: "a".into() }).await.unwrap();
        let svc = ResourceService::with_parent(children.clone(), parents.clone());
        svc.create(child(1, "row")).await.unwrap();
        parents.delete_by_id(1).await.unwrap();

        assert_eq!(svc.fetch_by_id(1).await.unwrap().1, "row");
        svc.delete_by_id(1).await.unwrap();
    }

    #[tokio::test]
    async fn edit_of_deleted_row_is_not_found() {
        let svc = ResourceService::new(parents());
        svc.create(Parent { name: "a".into() }).await.unwrap();
        svc.delete_by_id(1).await.unwrap();

        let err = svc.edit_by_id(1, Parent { name: "b".into() }).await.unwrap_err();
        assert!(matches!(err, AppError::NotFound));
    }

    #[tokio::test]
    async fn second_delete_is_not_found() {
        let svc = ResourceService::new(parents());
        svc.create(Parent { name: "a".into() }).await.unwrap();
        svc.delete_by_id(1).await.unwrap();
        assert!(matches!(svc.delete_by_id(1).await.unwrap_err(), AppError::NotFound));
        assert!(matches!(svc.fetch_by_id(1).await.unwrap_err(), AppError::NotFound));
    }

    #[tokio::test]
    async fn fetch_all_is_newest_first_and_live_only() {
        let svc = ResourceService::new(parents());
        for name in ["first", "second", "third"] {
            svc.create(Parent { name: name.into() }).await.unwrap();
        }
        svc.delete_by_id(2).await.unwrap();

        let names: Vec<String> = svc.fetch_all().await.unwrap().into_iter().map(|r| r.1).collect();
        assert_eq!(names, vec!["third", "first"]);
    }

    #[tokio::test]
    async fn fetch_by_parent_defaults_to_unimplemented() {
        let svc = ResourceService::new(parents());
        let err = svc.fetch_by_parent(1).await.unwrap_err();
        assert!(matches!(err, AppError::Unimplemented(_)));
    }
}
