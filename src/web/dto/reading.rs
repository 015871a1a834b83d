use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::content::{
    AuthoringResult, QuestionGroup, QuestionPatch, TestForm, ValidationScope, Validator,
};

/// Overrides for the configured validator. Unset fields keep the server default.
#[derive(Debug, Clone, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ValidateQuery {
    pub scope: Option<ValidationScope>,
    pub check_answers: Option<bool>,
}

impl ValidateQuery {
    pub fn apply(&self, base: &Validator) -> Validator {
        Validator::new(
            self.scope.unwrap_or(base.scope),
            self.check_answers.unwrap_or(base.check_answers),
        )
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SubmitTestRequest {
    pub exam_id: Uuid,
    pub form: TestForm,
}

/// One authoring step applied to a group the client holds.
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum GroupEdit {
    AddQuestion {
        start_number: u32,
    },
    UpdateQuestion {
        index: usize,
        #[schema(value_type = Object)]
        patch: QuestionPatch,
    },
    RemoveQuestion {
        index: usize,
    },
    UpdateChoices {
        choices: Vec<String>,
    },
    AddChoice {},
    RemoveChoice {
        index: usize,
    },
}

impl GroupEdit {
    pub fn apply(self, group: &QuestionGroup) -> AuthoringResult<QuestionGroup> {
        match self {
            Self::AddQuestion { start_number } => Ok(group.add_question(start_number)),
            Self::UpdateQuestion { index, patch } => group.update_question(index, patch),
            Self::RemoveQuestion { index } => group.remove_question(index),
            Self::UpdateChoices { choices } => group.update_choices(choices),
            Self::AddChoice {} => group.add_choice(),
            Self::RemoveChoice { index } => group.remove_choice(index),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct GroupEditRequest {
    pub group: QuestionGroup,
    pub edit: GroupEdit,
}

#[derive(Debug, Clone, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaginationQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    20
}
