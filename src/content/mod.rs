//! Reading test content: question groups, the document they are assembled into,
//! and the checks run before a test is submitted.

pub mod assembler;
pub use assembler::{PartDraft, TestForm, TestType, assemble};

pub mod document;
pub use document::{TestData, TestPart};

pub mod editor;
pub use editor::{AuthoringForm, GroupEditor};

mod error;
pub use error::{AuthoringError, AuthoringResult};

pub mod group;
pub use group::{QuestionGroup, start_numbers};

pub mod question;
pub use question::{GroupType, QuestionPatch, TfngAnswer};

pub mod validator;
pub use validator::{ValidationReport, ValidationScope, Validator, validate};
