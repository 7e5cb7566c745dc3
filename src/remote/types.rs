use serde::{Deserialize, Serialize};

use crate::error::FlowError;

use super::Alteration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlterKind {
    AddVariable,
    DeleteVariable,
    Change,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlterRequest {
    pub kind: AlterKind,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

impl From<&Alteration> for AlterRequest {
    fn from(value: &Alteration) -> Self {
        match value {
            Alteration::AddVariable { name, value } => AlterRequest {
                kind: AlterKind::AddVariable,
                name: name.clone(),
                value: Some(value.clone()),
            },
            Alteration::DeleteVariable { name } => AlterRequest {
                kind: AlterKind::DeleteVariable,
                name: name.clone(),
                value: None,
            },
            Alteration::Change { name, value } => AlterRequest {
                kind: AlterKind::Change,
                name: name.clone(),
                value: Some(value.clone()),
            },
        }
    }
}

impl TryFrom<AlterRequest> for Alteration {
    type Error = FlowError;

    fn try_from(req: AlterRequest) -> Result<Self, Self::Error> {
        let AlterRequest { kind, name, value } = req;
        if name.trim().is_empty() {
            return Err(FlowError::Validation("alter name is empty".to_string()));
        }
        match (kind, value) {
            (AlterKind::DeleteVariable, _) => Ok(Alteration::DeleteVariable { name }),
            (AlterKind::AddVariable, Some(value)) => Ok(Alteration::AddVariable { name, value }),
            (AlterKind::Change, Some(value)) => Ok(Alteration::Change { name, value }),
            (_, None) => Err(FlowError::Validation(format!(
                "alter {} needs a value",
                name
            ))),
        }
    }
}
