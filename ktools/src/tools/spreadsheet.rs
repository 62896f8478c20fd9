//! Spreadsheet assistant: turns a natural-language instruction plus a
//! preview of the sheet into a list of edit operations.
//!
//! ```rust
//! use ktools::Spreadsheet;
//!
//! let sheet = Spreadsheet::new("budget.xlsx", "Q1")
//!     .with_sheets(["Q1", "Q2"])
//!     .with_rows(vec![
//!         vec!["Item".to_string(), "Cost".to_string()],
//!         vec![String::new(), String::new()],
//!         vec!["Rent".to_string(), "1200".to_string()],
//!     ]);
//!
//! let context = sheet.context();
//! assert!(context.starts_with("Filename: budget.xlsx\nActive Sheet: Q1\nSheets: Q1, Q2\n"));
//! assert!(context.contains("Item\tCost\nRent\t1200\n"));
//! ```

use kcommon::{BoxFuture, RequestOptions};
use kcontract::{FieldKind, ShapeDescriptor};
use kengine::{Contract, Invocation, OrchestrationFailure, Tool};
use kprovider::Prompt;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::common::{TextReport, completion};

const PREVIEW_ROWS: usize = 10;

const OPERATION_TYPES: &[&str] = &[
    "update_cell",
    "update_row",
    "update_column",
    "add_row",
    "add_column",
    "delete_row",
    "delete_column",
    "format",
    "create_chart",
    "find_replace",
];

const SPREADSHEET_DISCLAIMER: &str =
    "AI-suggested operations. Review each change before applying it to your data.";

/// Snapshot of the workbook the user is editing.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Spreadsheet {
    pub file_name: String,
    pub active_sheet: String,
    pub sheets: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Spreadsheet {
    pub fn new(file_name: impl Into<String>, active_sheet: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            active_sheet: active_sheet.into(),
            ..Self::default()
        }
    }

    pub fn with_sheets<I, S>(mut self, sheets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sheets = sheets.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_rows(mut self, rows: Vec<Vec<String>>) -> Self {
        self.rows = rows;
        self
    }

    /// Prompt context: workbook metadata followed by the first rows of the
    /// active sheet, tab separated. Rows with only blank cells are skipped.
    pub fn context(&self) -> String {
        let mut context = format!(
            "Filename: {}\nActive Sheet: {}\nSheets: {}\n\nSpreadsheet Data (first {PREVIEW_ROWS} rows):\n",
            self.file_name,
            self.active_sheet,
            self.sheets.join(", "),
        );

        let mut wrote_any = false;
        for row in self.rows.iter().take(PREVIEW_ROWS) {
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            context.push_str(&row.join("\t"));
            context.push('\n');
            wrote_any = true;
        }
        if !wrote_any {
            context.push_str("The spreadsheet is currently empty.\n");
        }
        context
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SpreadsheetRequest {
    pub spreadsheet: Spreadsheet,
    pub instruction: String,
}

impl SpreadsheetRequest {
    pub fn new(spreadsheet: Spreadsheet, instruction: impl Into<String>) -> Self {
        Self {
            spreadsheet,
            instruction: instruction.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationType {
    UpdateCell,
    UpdateRow,
    UpdateColumn,
    AddRow,
    AddColumn,
    DeleteRow,
    DeleteColumn,
    Format,
    CreateChart,
    FindReplace,
}

impl OperationType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::UpdateCell => "update_cell",
            Self::UpdateRow => "update_row",
            Self::UpdateColumn => "update_column",
            Self::AddRow => "add_row",
            Self::AddColumn => "add_column",
            Self::DeleteRow => "delete_row",
            Self::DeleteColumn => "delete_column",
            Self::Format => "format",
            Self::CreateChart => "create_chart",
            Self::FindReplace => "find_replace",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetOperation {
    #[serde(rename = "type")]
    pub operation: OperationType,
    /// Operation-specific arguments; their shape depends on `operation`.
    #[serde(default)]
    pub details: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadsheetPlan {
    #[serde(default)]
    pub operations: Vec<SpreadsheetOperation>,
    pub explanation: String,
}

impl Contract for SpreadsheetPlan {
    fn shape() -> ShapeDescriptor {
        let operation = ShapeDescriptor::new()
            .required("type", FieldKind::Enum(OPERATION_TYPES))
            .optional("details", FieldKind::Any);

        ShapeDescriptor::new()
            .optional("operations", FieldKind::array_of(FieldKind::Object(operation)))
            .required("explanation", FieldKind::String)
    }
}

impl SpreadsheetPlan {
    pub fn to_text_report(&self) -> String {
        let operations = self
            .operations
            .iter()
            .map(|op| match &op.details {
                Value::Null => op.operation.as_str().to_string(),
                details => format!("{} {details}", op.operation.as_str()),
            })
            .collect::<Vec<_>>();

        TextReport::new("Spreadsheet Assistant Report")
            .field("Operations", operations.len().to_string())
            .gap()
            .section("Explanation", &self.explanation)
            .list("Planned Operations", &operations)
            .finish(SPREADSHEET_DISCLAIMER)
    }
}

#[derive(Debug, Clone)]
pub struct SpreadsheetTool {
    request: SpreadsheetRequest,
    options: RequestOptions,
}

impl SpreadsheetTool {
    pub fn new(request: SpreadsheetRequest) -> Self {
        Self {
            request,
            options: RequestOptions::default(),
        }
    }

    pub fn with_options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    fn prompt(&self) -> Prompt {
        Prompt::new(format!(
            "You are an AI assistant that helps users edit spreadsheets.\n\n\
{context}\n\
User request: {instruction}\n\n\
Respond with a JSON object with these keys:\n\
- \"operations\": (array) edits to apply, each an object with:\n\
    \"type\": one of {types},\n\
    \"details\": (object) the arguments for that edit, e.g. {{\"row\": 2, \"column\": \"B\", \"value\": \"42\"}}\n\
- \"explanation\": (string) a short explanation of what you did or your answer to the user\n\
If the request is only a question about the data, return an empty \"operations\" array.",
            context = self.request.spreadsheet.context(),
            instruction = self.request.instruction.trim(),
            types = OPERATION_TYPES
                .iter()
                .map(|kind| format!("\"{kind}\""))
                .collect::<Vec<_>>()
                .join(", "),
        ))
    }
}

impl Tool for SpreadsheetTool {
    type Output = SpreadsheetPlan;

    fn kind(&self) -> &'static str {
        "spreadsheet"
    }

    fn validate_input(&self) -> Result<(), String> {
        if self.request.instruction.trim().is_empty() {
            return Err("an instruction is required".to_string());
        }
        Ok(())
    }

    fn run<'a>(
        &'a self,
        invocation: &'a mut Invocation,
    ) -> BoxFuture<'a, Result<Self::Output, OrchestrationFailure>> {
        Box::pin(async move {
            let request = completion(invocation, &self.options, self.prompt());
            invocation.complete_json("plan", request).await
        })
    }
}
