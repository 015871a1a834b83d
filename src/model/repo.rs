use serde::{Deserialize, Serialize};

use crate::model::{ModelManager, error::DatabaseResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceType {
    ReadingTest,
    TestDocument,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, limit: i64, offset: i64) -> Self {
        Self {
            items,
            total,
            limit,
            offset,
        }
    }
}

pub trait ResourceTyped {
    fn get_resource_type() -> ResourceType;
}

/// Persistence seam for stored content. Implementations own their SQL.
#[async_trait::async_trait]
pub trait CrudRepository<T, CreateUpdate, V>
where
    T: ResourceTyped,
    V: Clone + Copy,
{
    async fn create(mm: &ModelManager, data: CreateUpdate) -> DatabaseResult<T>;

    async fn update(self, mm: &ModelManager, data: CreateUpdate) -> DatabaseResult<T>
    where
        Self: Sized;

    async fn delete(self, mm: &ModelManager) -> DatabaseResult<()>
    where
        Self: Sized;

    async fn find_by_id(mm: &ModelManager, id: V) -> DatabaseResult<Option<T>>;

    async fn list(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Vec<T>>;

    async fn count(mm: &ModelManager) -> DatabaseResult<i64>;
}

#[async_trait::async_trait]
pub trait PaginatableRepository<T, CreateUpdate, V>
where
    T: ResourceTyped + CrudRepository<T, CreateUpdate, V>,
    V: Clone + Copy,
{
    async fn page(mm: &ModelManager, limit: i64, offset: i64) -> DatabaseResult<Page<T>>;
}

#[macro_export]
macro_rules! impl_paginatable_for {
    ($ent:ident, $ent_create:ident, $ent_id:ident) => {
        #[async_trait::async_trait]
        impl $crate::model::PaginatableRepository<$ent, $ent_create, $ent_id> for $ent {
            async fn page(
                mm: &$crate::model::ModelManager,
                limit: i64,
                offset: i64,
            ) -> $crate::model::DatabaseResult<$crate::model::Page<$ent>> {
                let items = $ent::list(mm, limit, offset).await?;
                let count = $ent::count(mm).await?;
                Ok($crate::model::Page::new(items, count, limit, offset))
            }
        }
    };
}
