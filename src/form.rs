//! Generic add/edit form controller.
//!
//! Form values are kept as the strings the inputs produce. Validation
//! coerces them into the JSON shape of the entity's `*Input` type; the
//! mutation is only sent once every attachment is on the server.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use futures::future::join_all;
use serde_json::{Map, Value};
use tracing::{error, info, warn};
use zatca_shared::graphql::{Create, CreateArgs, ListAll, NoVariables, Update, UpdateArgs};
use zatca_shared::{
    City, Country, Currency, Editable, Entity, EntityKind, EntityRef, Equipment, Exercise,
    Invoice, Language, ManagedUser, MuscleGroup, ProgramDay, Promotion, Questionnaire, UserType,
    WorkoutCategory, WorkoutGroup,
};

use crate::api::GraphqlClient;
use crate::cookies::CookieStore;
use crate::error::{ApiError, ApiResult, FieldErrors};
use crate::notify::Notifier;
use crate::request::HttpClient;
use crate::route::AppRoute;
use crate::upload::{Attachment, Uploader};

mod schema;

pub use schema::schema_for;

const DATE_FORMAT: &str = "%Y-%m-%d";
const UPLOAD_FAILED: &str = "Upload failed, please try again";

// =========================================================
// 表单定义 (Form Schema)
// =========================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Email,
    Number,
    Integer,
    /// `YYYY-MM-DD`.
    Date,
    Boolean,
    /// Id of a related record; options come from the given entity.
    Select(EntityKind),
    /// One entry per line.
    List,
    Image,
    Video,
}

impl FieldKind {
    pub fn is_attachment(&self) -> bool {
        matches!(self, Self::Image | Self::Video)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Key in the mutation input.
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormSchema {
    pub kind: EntityKind,
    /// Singular noun used in messages, e.g. "Language".
    pub noun: &'static str,
    pub fields: &'static [FieldSpec],
}

impl FormSchema {
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Where a successful save navigates to.
    pub fn redirect(&self) -> String {
        let list = AppRoute::List(self.kind).to_path();
        match AppRoute::from_path(&list) {
            AppRoute::List(_) => list,
            _ => AppRoute::Home.to_path(),
        }
    }
}

// =========================================================
// 表单状态 (Form State)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(String),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    values: BTreeMap<String, String>,
    attachments: BTreeMap<String, Attachment>,
    errors: FieldErrors,
    pub submitting: bool,
}

impl FormState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn value(&self, name: &str) -> &str {
        self.values.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Editing a field clears its error.
    pub fn set_value(&mut self, name: &str, value: &str) {
        self.values.insert(name.to_string(), value.to_string());
        self.errors.remove(name);
    }

    pub fn attachment(&self, name: &str) -> Option<&Attachment> {
        self.attachments.get(name)
    }

    pub fn set_attachment(&mut self, name: &str, attachment: Attachment) {
        self.attachments.insert(name.to_string(), attachment);
        self.errors.remove(name);
    }

    pub fn error(&self, name: &str) -> Option<&str> {
        self.errors.get(name).map(String::as_str)
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Takes back a submission that ran on `started`, a copy of this form.
    ///
    /// Values typed in the meantime are kept and lose their error; an
    /// upload result only lands on a field whose file was not picked
    /// again while the submission ran.
    pub fn finish_submit(&mut self, started: &FormState, finished: FormState) {
        let edited: Vec<String> = finished
            .errors
            .keys()
            .chain(finished.attachments.keys())
            .filter(|name| {
                self.values.get(*name) != started.values.get(*name)
                    || self.attachments.get(*name) != started.attachments.get(*name)
            })
            .cloned()
            .collect();
        let edited = |name: &String| edited.contains(name);

        for (name, attachment) in finished.attachments {
            if !edited(&name) {
                self.attachments.insert(name, attachment);
            }
        }
        self.errors = finished
            .errors
            .into_iter()
            .filter(|(name, _)| !edited(name))
            .collect();
        self.submitting = false;
    }

    /// Fills the form from a loaded record (edit pages).
    pub fn load_record<E: Editable>(&mut self, schema: &FormSchema, record: &E) {
        let input = match serde_json::to_value(record.to_input()) {
            Ok(Value::Object(map)) => map,
            Ok(_) | Err(_) => {
                warn!(kind = %E::KIND, "record could not be loaded into the form");
                return;
            }
        };

        for field in schema.fields {
            let value = input.get(field.name).unwrap_or(&Value::Null);
            if field.kind.is_attachment() {
                if let Some(path) = value.as_str().filter(|p| !p.is_empty()) {
                    self.attachments
                        .insert(field.name.to_string(), Attachment::uploaded(path));
                }
                continue;
            }
            self.values
                .insert(field.name.to_string(), display_value(field.kind, value));
        }
        self.errors.clear();
    }

    /// Coerces every field into the mutation input. Attachments are only
    /// checked for presence here; uploaded paths are added by `submit`.
    pub fn validate(&self, schema: &FormSchema) -> Result<Map<String, Value>, FieldErrors> {
        let mut out = Map::new();
        let mut errors = FieldErrors::new();

        for field in schema.fields {
            if field.kind.is_attachment() {
                match self.attachments.get(field.name) {
                    Some(Attachment::Uploaded { path }) => {
                        out.insert(field.name.to_string(), Value::String(path.clone()));
                    }
                    Some(Attachment::Pending(_)) => {}
                    None if field.required => {
                        errors.insert(field.name.to_string(), required(field));
                    }
                    None => {
                        out.insert(field.name.to_string(), Value::Null);
                    }
                }
                continue;
            }

            match coerce(field, self.value(field.name)) {
                Ok(value) => {
                    out.insert(field.name.to_string(), value);
                }
                Err(message) => {
                    errors.insert(field.name.to_string(), message);
                }
            }
        }

        if errors.is_empty() {
            Ok(out)
        } else {
            Err(errors)
        }
    }

    /// Attaches server field errors to matching fields. Returns the toast
    /// to show when nothing could be attached inline.
    pub fn apply_error(&mut self, schema: &FormSchema, err: &ApiError) -> Option<String> {
        match err {
            ApiError::Validation(fields) => {
                let mut attached = false;
                for (name, message) in fields {
                    if schema.field(name).is_some() {
                        self.errors.insert(name.clone(), message.clone());
                        attached = true;
                    }
                }
                (!attached).then(|| err.toast_message())
            }
            ApiError::Unauthorized => None,
            other => Some(other.toast_message()),
        }
    }
}

fn required(field: &FieldSpec) -> String {
    format!("{} is required", field.label)
}

/// Parses one raw input value according to its field kind.
fn coerce(field: &FieldSpec, raw: &str) -> Result<Value, String> {
    let raw = raw.trim();

    if field.kind == FieldKind::Boolean {
        return Ok(Value::Bool(matches!(raw, "true" | "on" | "1")));
    }
    if field.kind == FieldKind::List {
        let items: Vec<Value> = raw
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .map(|l| Value::String(l.to_string()))
            .collect();
        if items.is_empty() && field.required {
            return Err(required(field));
        }
        return Ok(Value::Array(items));
    }
    if raw.is_empty() {
        return if field.required {
            Err(required(field))
        } else {
            Ok(Value::Null)
        };
    }

    match field.kind {
        FieldKind::Text | FieldKind::Select(_) => Ok(Value::String(raw.to_string())),
        FieldKind::Email => {
            if is_email(raw) {
                Ok(Value::String(raw.to_string()))
            } else {
                Err("Invalid e-mail address".to_string())
            }
        }
        FieldKind::Number => raw
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .and_then(serde_json::Number::from_f64)
            .map(Value::Number)
            .ok_or_else(|| format!("{} must be a number", field.label)),
        FieldKind::Integer => raw
            .parse::<u32>()
            .map(Value::from)
            .map_err(|_| format!("{} must be a whole number", field.label)),
        FieldKind::Date => NaiveDate::parse_from_str(raw, DATE_FORMAT)
            .map(|d| Value::String(d.format(DATE_FORMAT).to_string()))
            .map_err(|_| format!("{} must be a date (YYYY-MM-DD)", field.label)),
        FieldKind::Boolean | FieldKind::List | FieldKind::Image | FieldKind::Video => {
            Ok(Value::Null)
        }
    }
}

fn is_email(s: &str) -> bool {
    match s.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}

/// Inverse of `coerce`, for pre-filling inputs.
fn display_value(kind: FieldKind, value: &Value) -> String {
    match (kind, value) {
        (_, Value::Null) => String::new(),
        (FieldKind::List, Value::Array(items)) => items
            .iter()
            .filter_map(Value::as_str)
            .collect::<Vec<_>>()
            .join("\n"),
        (_, Value::String(s)) => s.clone(),
        (_, other) => other.to_string(),
    }
}

// =========================================================
// 提交流程 (Submission)
// =========================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    Saved { message: String, redirect: String },
    /// Local or server field errors are on the form.
    Invalid,
    /// An attachment could not be uploaded.
    Blocked,
    /// Toast message.
    Failed(String),
    Unauthorized,
}

/// Validates, uploads pending attachments, then runs the create or
/// update mutation.
pub async fn submit<E, H, K, U, N>(
    form: &mut FormState,
    schema: &FormSchema,
    mode: &FormMode,
    client: &GraphqlClient<H, K>,
    uploader: &Uploader<U, N>,
) -> SubmitOutcome
where
    E: Editable,
    H: HttpClient,
    K: CookieStore,
    U: HttpClient,
    N: Notifier,
{
    form.submitting = true;
    let outcome = run_submit::<E, H, K, U, N>(form, schema, mode, client, uploader).await;
    form.submitting = false;
    outcome
}

async fn run_submit<E, H, K, U, N>(
    form: &mut FormState,
    schema: &FormSchema,
    mode: &FormMode,
    client: &GraphqlClient<H, K>,
    uploader: &Uploader<U, N>,
) -> SubmitOutcome
where
    E: Editable,
    H: HttpClient,
    K: CookieStore,
    U: HttpClient,
    N: Notifier,
{
    form.errors.clear();
    let mut values = match form.validate(schema) {
        Ok(values) => values,
        Err(errors) => {
            form.errors = errors;
            return SubmitOutcome::Invalid;
        }
    };

    let pending: Vec<(String, Attachment)> = form
        .attachments
        .iter()
        .filter(|(name, a)| !a.is_uploaded() && schema.field(name).is_some())
        .map(|(name, a)| (name.clone(), a.clone()))
        .collect();
    let uploads = pending.into_iter().map(|(name, attachment)| async move {
        (name, uploader.upload(attachment).await)
    });
    let mut blocked = false;
    for (name, attachment) in join_all(uploads).await {
        match attachment.path() {
            Some(path) => {
                values.insert(name.clone(), Value::String(path.to_string()));
            }
            None => {
                form.errors.insert(name.clone(), UPLOAD_FAILED.to_string());
                blocked = true;
            }
        }
        form.attachments.insert(name, attachment);
    }
    if blocked {
        return SubmitOutcome::Blocked;
    }

    let input: E::Input = match serde_json::from_value(Value::Object(values)) {
        Ok(input) => input,
        Err(e) => {
            error!(kind = %E::KIND, error = %e, "form values do not match the mutation input");
            return SubmitOutcome::Failed("The form could not be submitted".to_string());
        }
    };

    let (result, verb) = match mode {
        FormMode::Create => (
            client.execute::<Create<E>>(&CreateArgs { input }).await,
            "created",
        ),
        FormMode::Edit(id) => (
            client
                .execute::<Update<E>>(&UpdateArgs {
                    id: id.clone(),
                    input,
                })
                .await,
            "updated",
        ),
    };

    match result {
        Ok(saved) => {
            info!(kind = %E::KIND, id = %saved.id(), "{verb}");
            SubmitOutcome::Saved {
                message: format!("{} {verb} successfully", schema.noun),
                redirect: schema.redirect(),
            }
        }
        Err(ApiError::Unauthorized) => SubmitOutcome::Unauthorized,
        Err(err) => match form.apply_error(schema, &err) {
            Some(toast) => SubmitOutcome::Failed(toast),
            None => SubmitOutcome::Invalid,
        },
    }
}

// =========================================================
// 下拉选项 (Select options)
// =========================================================

fn options_from<E: Entity>(rows: Vec<E>) -> Vec<EntityRef> {
    rows.into_iter()
        .map(|row| EntityRef {
            id: row.id().to_string(),
            name: row.cells().into_iter().next().unwrap_or_default(),
        })
        .collect()
}

async fn options_of<E, H, K>(client: &GraphqlClient<H, K>) -> ApiResult<Vec<EntityRef>>
where
    E: Entity,
    H: HttpClient,
    K: CookieStore,
{
    let rows = client.execute::<ListAll<E>>(&NoVariables {}).await?;
    Ok(options_from(rows))
}

/// `{id, name}` pairs for a select field.
pub async fn fetch_options<H, K>(
    client: &GraphqlClient<H, K>,
    kind: EntityKind,
) -> ApiResult<Vec<EntityRef>>
where
    H: HttpClient,
    K: CookieStore,
{
    match kind {
        EntityKind::Country => options_of::<Country, H, K>(client).await,
        EntityKind::City => options_of::<City, H, K>(client).await,
        EntityKind::Currency => options_of::<Currency, H, K>(client).await,
        EntityKind::Language => options_of::<Language, H, K>(client).await,
        EntityKind::User => options_of::<ManagedUser, H, K>(client).await,
        EntityKind::UserType => options_of::<UserType, H, K>(client).await,
        EntityKind::MuscleGroup => options_of::<MuscleGroup, H, K>(client).await,
        EntityKind::Equipment => options_of::<Equipment, H, K>(client).await,
        EntityKind::Exercise => options_of::<Exercise, H, K>(client).await,
        EntityKind::WorkoutCategory => options_of::<WorkoutCategory, H, K>(client).await,
        EntityKind::WorkoutGroup => options_of::<WorkoutGroup, H, K>(client).await,
        EntityKind::ProgramDay => options_of::<ProgramDay, H, K>(client).await,
        EntityKind::Promotion => options_of::<Promotion, H, K>(client).await,
        EntityKind::Questionnaire => options_of::<Questionnaire, H, K>(client).await,
        EntityKind::Invoice => options_of::<Invoice, H, K>(client).await,
    }
}

#[cfg(test)]
mod tests;
