//! Stub lookup and literal token substitution

use crate::replacements::ReplacementMap;
use crate::{Result, ScaffoldError};
use rust_embed::RustEmbed;
use std::path::{Path, PathBuf};
use tokio::fs;

#[derive(RustEmbed)]
#[folder = "stubs/"]
struct DefaultStubs;

/// Every stub the generator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StubKind {
    Model,
    Controller,
    ViewIndex,
    ViewCreate,
    ViewEdit,
    ViewForm,
    ViewShow,
    FormField,
    FormFieldSelect,
    ViewField,
    Layout,
}

impl StubKind {
    /// Page templates, in generation order
    pub const VIEWS: [StubKind; 5] = [
        StubKind::ViewIndex,
        StubKind::ViewCreate,
        StubKind::ViewEdit,
        StubKind::ViewForm,
        StubKind::ViewShow,
    ];

    /// Path relative to the stub directory
    pub fn relative_path(self) -> &'static str {
        match self {
            StubKind::Model => "Model.stub",
            StubKind::Controller => "Controller.stub",
            StubKind::ViewIndex => "views/index.stub",
            StubKind::ViewCreate => "views/create.stub",
            StubKind::ViewEdit => "views/edit.stub",
            StubKind::ViewForm => "views/form.stub",
            StubKind::ViewShow => "views/show.stub",
            StubKind::FormField => "views/form-field.stub",
            StubKind::FormFieldSelect => "views/form-field-select.stub",
            StubKind::ViewField => "views/view-field.stub",
            StubKind::Layout => "layouts/app.stub",
        }
    }

    /// Output file stem for page templates
    pub fn view_name(self) -> Option<&'static str> {
        match self {
            StubKind::ViewIndex => Some("index"),
            StubKind::ViewCreate => Some("create"),
            StubKind::ViewEdit => Some("edit"),
            StubKind::ViewForm => Some("form"),
            StubKind::ViewShow => Some("show"),
            _ => None,
        }
    }
}

/// Loads stubs from an override directory, falling back to the embedded set
#[derive(Debug, Clone, Default)]
pub struct StubLoader {
    override_dir: Option<PathBuf>,
}

impl StubLoader {
    pub fn new(override_dir: Option<PathBuf>) -> Self {
        Self { override_dir }
    }

    pub fn override_dir(&self) -> Option<&Path> {
        self.override_dir.as_deref()
    }

    pub async fn load(&self, kind: StubKind) -> Result<String> {
        let relative = kind.relative_path();

        if let Some(dir) = &self.override_dir {
            let path = dir.join(relative);
            let is_file = fs::metadata(&path)
                .await
                .map(|meta| meta.is_file())
                .unwrap_or(false);
            if is_file {
                log::debug!("Using stub override: {}", path.display());
                return fs::read_to_string(&path).await.map_err(|e| ScaffoldError::Stub {
                    name: relative.to_string(),
                    message: format!("failed to read {}: {}", path.display(), e),
                });
            }
        }

        let file = DefaultStubs::get(relative).ok_or_else(|| ScaffoldError::Stub {
            name: relative.to_string(),
            message: "no such stub".to_string(),
        })?;
        String::from_utf8(file.data.into_owned()).map_err(|e| ScaffoldError::Stub {
            name: relative.to_string(),
            message: e.to_string(),
        })
    }
}

/// Replace every token of `replacements` in `template`, in map order
pub fn render(template: &str, replacements: &ReplacementMap) -> String {
    let mut output = template.to_string();
    for (token, value) in replacements.iter() {
        if output.contains(token.as_str()) {
            output = output.replace(token.as_str(), value);
        }
    }
    output
}
