mod reading_test;
pub use reading_test::{ReadingTest, ReadingTestCreate, ReadingTestRevision, document_from_rows};
