//! Records mirrored from the remote API.
//!
//! The console holds no authoritative state: every record here is a
//! passive copy of what the GraphQL service returned.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use std::fmt;

// =========================================================
// EntityKind
// =========================================================

/// Every entity the console manages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Country,
    City,
    Currency,
    Language,
    User,
    UserType,
    MuscleGroup,
    Equipment,
    Exercise,
    WorkoutCategory,
    WorkoutGroup,
    ProgramDay,
    Promotion,
    Questionnaire,
    Invoice,
}

impl EntityKind {
    pub const ALL: [EntityKind; 15] = [
        EntityKind::Country,
        EntityKind::City,
        EntityKind::Currency,
        EntityKind::Language,
        EntityKind::User,
        EntityKind::UserType,
        EntityKind::MuscleGroup,
        EntityKind::Equipment,
        EntityKind::Exercise,
        EntityKind::WorkoutCategory,
        EntityKind::WorkoutGroup,
        EntityKind::ProgramDay,
        EntityKind::Promotion,
        EntityKind::Questionnaire,
        EntityKind::Invoice,
    ];

    /// Route prefix of the entity's pages.
    pub fn route_base(&self) -> &'static str {
        match self {
            Self::Country => "/country",
            Self::City => "/city",
            Self::Currency => "/currency",
            Self::Language => "/language",
            Self::User => "/user",
            Self::UserType => "/usertype",
            Self::MuscleGroup => "/muscle-group",
            Self::Equipment => "/equipements",
            Self::Exercise => "/exercises",
            Self::WorkoutCategory => "/workout/categories",
            Self::WorkoutGroup => "/workout/groups",
            Self::ProgramDay => "/workout/programmes-day",
            Self::Promotion => "/promotions",
            Self::Questionnaire => "/questionnaires",
            Self::Invoice => "/invoices",
        }
    }

    /// Inverse of [`EntityKind::route_base`].
    pub fn from_route_base(base: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.route_base() == base)
    }

    /// Capability subject checked by the ability guard.
    pub fn subject(&self) -> &'static str {
        match self {
            Self::Country => "country",
            Self::City => "city",
            Self::Currency => "currency",
            Self::Language => "language",
            Self::User => "user",
            Self::UserType => "usertype",
            Self::MuscleGroup => "muscle-group",
            Self::Equipment => "equipment",
            Self::Exercise => "exercise",
            Self::WorkoutCategory => "workout-category",
            Self::WorkoutGroup => "workout-group",
            Self::ProgramDay => "programme-day",
            Self::Promotion => "promotion",
            Self::Questionnaire => "questionnaire",
            Self::Invoice => "invoice",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Country => "Countries",
            Self::City => "Cities",
            Self::Currency => "Currencies",
            Self::Language => "Languages",
            Self::User => "Users",
            Self::UserType => "User types",
            Self::MuscleGroup => "Muscle groups",
            Self::Equipment => "Equipment",
            Self::Exercise => "Exercises",
            Self::WorkoutCategory => "Workout categories",
            Self::WorkoutGroup => "Workout groups",
            Self::ProgramDay => "Programme days",
            Self::Promotion => "Promotions",
            Self::Questionnaire => "Questionnaires",
            Self::Invoice => "Invoices",
        }
    }

    /// GraphQL type name, used to derive operation and field names.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Country => "Country",
            Self::City => "City",
            Self::Currency => "Currency",
            Self::Language => "Language",
            Self::User => "User",
            Self::UserType => "UserType",
            Self::MuscleGroup => "MuscleGroup",
            Self::Equipment => "Equipment",
            Self::Exercise => "Exercise",
            Self::WorkoutCategory => "WorkoutCategory",
            Self::WorkoutGroup => "WorkoutGroup",
            Self::ProgramDay => "ProgramDay",
            Self::Promotion => "Promotion",
            Self::Questionnaire => "Questionnaire",
            Self::Invoice => "Invoice",
        }
    }

    /// Root field returning one record, e.g. `muscleGroup`.
    pub fn detail_field(&self) -> String {
        lower_first(self.type_name())
    }

    /// Root field returning the collection, e.g. `muscleGroups`.
    pub fn list_field(&self) -> String {
        match self {
            Self::Country => "countries".to_string(),
            Self::City => "cities".to_string(),
            Self::Currency => "currencies".to_string(),
            Self::Equipment => "equipments".to_string(),
            _ => format!("{}s", self.detail_field()),
        }
    }

    /// Root field returning one server-side page, e.g. `paginatedCities`.
    pub fn paged_field(&self) -> String {
        let list = self.list_field();
        format!("paginated{}", upper_first(&list))
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.title())
    }
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) => c.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =========================================================
// Entity traits
// =========================================================

/// A record that can be listed in a data grid.
pub trait Entity:
    Clone + PartialEq + fmt::Debug + Serialize + DeserializeOwned + Send + Sync + 'static
{
    const KIND: EntityKind;
    /// GraphQL selection set for one record.
    const SELECTION: &'static str;
    /// Column headers, aligned with [`Entity::cells`].
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> &str;

    /// Fields matched by client-side search.
    fn search_fields(&self) -> Vec<&str>;

    /// Row cells rendered as text.
    fn cells(&self) -> Vec<String>;

    /// Image shown as the row thumbnail, if any.
    fn thumbnail(&self) -> Option<&str> {
        None
    }
}

/// A record with create and update mutations.
pub trait Editable: Entity {
    type Input: Serialize + DeserializeOwned + Clone + fmt::Debug;

    /// Converts a loaded record back to form values for edit pages.
    fn to_input(&self) -> Self::Input;
}

/// `{ id, name }` reference to a related record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct EntityRef {
    pub id: String,
    pub name: String,
}

fn ref_name(r: &Option<EntityRef>) -> String {
    r.as_ref().map(|r| r.name.clone()).unwrap_or_default()
}

fn opt(s: &Option<String>) -> String {
    s.clone().unwrap_or_default()
}

// =========================================================
// Settings
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Country {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub phone_code: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CountryInput {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub phone_code: Option<String>,
    #[serde(default)]
    pub flag: Option<String>,
}

impl Entity for Country {
    const KIND: EntityKind = EntityKind::Country;
    const SELECTION: &'static str = "id name code phoneCode flag";
    const COLUMNS: &'static [&'static str] = &["Name", "Code", "Phone code"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.code.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.code.clone(), opt(&self.phone_code)]
    }

    fn thumbnail(&self) -> Option<&str> {
        self.flag.as_deref()
    }
}

impl Editable for Country {
    type Input = CountryInput;

    fn to_input(&self) -> CountryInput {
        CountryInput {
            name: self.name.clone(),
            code: self.code.clone(),
            phone_code: self.phone_code.clone(),
            flag: self.flag.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub country: Option<EntityRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CityInput {
    pub name: String,
    pub country_id: String,
}

impl Entity for City {
    const KIND: EntityKind = EntityKind::City;
    const SELECTION: &'static str = "id name country { id name }";
    const COLUMNS: &'static [&'static str] = &["Name", "Country"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(country) = &self.country {
            fields.push(&country.name);
        }
        fields
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), ref_name(&self.country)]
    }
}

impl Editable for City {
    type Input = CityInput;

    fn to_input(&self) -> CityInput {
        CityInput {
            name: self.name.clone(),
            country_id: self.country.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Currency {
    pub id: String,
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrencyInput {
    pub name: String,
    pub code: String,
    #[serde(default)]
    pub symbol: Option<String>,
}

impl Entity for Currency {
    const KIND: EntityKind = EntityKind::Currency;
    const SELECTION: &'static str = "id name code symbol";
    const COLUMNS: &'static [&'static str] = &["Name", "Code", "Symbol"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.code.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.code.clone(), opt(&self.symbol)]
    }
}

impl Editable for Currency {
    type Input = CurrencyInput;

    fn to_input(&self) -> CurrencyInput {
        CurrencyInput {
            name: self.name.clone(),
            code: self.code.clone(),
            symbol: self.symbol.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub id: String,
    pub name: String,
    pub code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageInput {
    pub name: String,
    pub code: String,
}

impl Entity for Language {
    const KIND: EntityKind = EntityKind::Language;
    const SELECTION: &'static str = "id name code";
    const COLUMNS: &'static [&'static str] = &["Name", "Code"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str(), self.code.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), self.code.clone()]
    }
}

impl Editable for Language {
    type Input = LanguageInput;

    fn to_input(&self) -> LanguageInput {
        LanguageInput {
            name: self.name.clone(),
            code: self.code.clone(),
        }
    }
}

// =========================================================
// Users
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUser {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub user_type: Option<EntityRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManagedUserInput {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    pub user_type_id: String,
}

impl Entity for ManagedUser {
    const KIND: EntityKind = EntityKind::User;
    const SELECTION: &'static str = "id firstName lastName email phone userType { id name }";
    const COLUMNS: &'static [&'static str] = &["First name", "Last name", "E-mail", "Type"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.first_name.as_str(), self.last_name.as_str(), self.email.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.first_name.clone(),
            self.last_name.clone(),
            self.email.clone(),
            ref_name(&self.user_type),
        ]
    }
}

impl Editable for ManagedUser {
    type Input = ManagedUserInput;

    fn to_input(&self) -> ManagedUserInput {
        ManagedUserInput {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            email: self.email.clone(),
            phone: self.phone.clone(),
            user_type_id: self.user_type.as_ref().map(|t| t.id.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserType {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserTypeInput {
    pub name: String,
}

impl Entity for UserType {
    const KIND: EntityKind = EntityKind::UserType;
    const SELECTION: &'static str = "id name";
    const COLUMNS: &'static [&'static str] = &["Name"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

impl Editable for UserType {
    type Input = UserTypeInput;

    fn to_input(&self) -> UserTypeInput {
        UserTypeInput {
            name: self.name.clone(),
        }
    }
}

// =========================================================
// Training
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MuscleGroupInput {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Entity for MuscleGroup {
    const KIND: EntityKind = EntityKind::MuscleGroup;
    const SELECTION: &'static str = "id name image";
    const COLUMNS: &'static [&'static str] = &["Name"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn thumbnail(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl Editable for MuscleGroup {
    type Input = MuscleGroupInput;

    fn to_input(&self) -> MuscleGroupInput {
        MuscleGroupInput {
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Equipment {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EquipmentInput {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Entity for Equipment {
    const KIND: EntityKind = EntityKind::Equipment;
    const SELECTION: &'static str = "id name image";
    const COLUMNS: &'static [&'static str] = &["Name"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn thumbnail(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl Editable for Equipment {
    type Input = EquipmentInput;

    fn to_input(&self) -> EquipmentInput {
        EquipmentInput {
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    #[serde(default)]
    pub muscle_group: Option<EntityRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub video: Option<String>,
    pub muscle_group_id: String,
}

impl Entity for Exercise {
    const KIND: EntityKind = EntityKind::Exercise;
    const SELECTION: &'static str = "id name description image video muscleGroup { id name }";
    const COLUMNS: &'static [&'static str] = &["Name", "Muscle group"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(group) = &self.muscle_group {
            fields.push(&group.name);
        }
        fields
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), ref_name(&self.muscle_group)]
    }

    fn thumbnail(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl Editable for Exercise {
    type Input = ExerciseInput;

    fn to_input(&self) -> ExerciseInput {
        ExerciseInput {
            name: self.name.clone(),
            description: self.description.clone(),
            image: self.image.clone(),
            video: self.video.clone(),
            muscle_group_id: self
                .muscle_group
                .as_ref()
                .map(|g| g.id.clone())
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCategory {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutCategoryInput {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

impl Entity for WorkoutCategory {
    const KIND: EntityKind = EntityKind::WorkoutCategory;
    const SELECTION: &'static str = "id name image";
    const COLUMNS: &'static [&'static str] = &["Name"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.name.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn thumbnail(&self) -> Option<&str> {
        self.image.as_deref()
    }
}

impl Editable for WorkoutCategory {
    type Input = WorkoutCategoryInput;

    fn to_input(&self) -> WorkoutCategoryInput {
        WorkoutCategoryInput {
            name: self.name.clone(),
            image: self.image.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutGroup {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub category: Option<EntityRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkoutGroupInput {
    pub name: String,
    pub category_id: String,
}

impl Entity for WorkoutGroup {
    const KIND: EntityKind = EntityKind::WorkoutGroup;
    const SELECTION: &'static str = "id name category { id name }";
    const COLUMNS: &'static [&'static str] = &["Name", "Category"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(category) = &self.category {
            fields.push(&category.name);
        }
        fields
    }

    fn cells(&self) -> Vec<String> {
        vec![self.name.clone(), ref_name(&self.category)]
    }
}

impl Editable for WorkoutGroup {
    type Input = WorkoutGroupInput;

    fn to_input(&self) -> WorkoutGroupInput {
        WorkoutGroupInput {
            name: self.name.clone(),
            category_id: self.category.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDay {
    pub id: String,
    pub name: String,
    pub day_number: u32,
    #[serde(default)]
    pub group: Option<EntityRef>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgramDayInput {
    pub name: String,
    pub day_number: u32,
    pub group_id: String,
}

impl Entity for ProgramDay {
    const KIND: EntityKind = EntityKind::ProgramDay;
    const SELECTION: &'static str = "id name dayNumber group { id name }";
    const COLUMNS: &'static [&'static str] = &["Day", "Name", "Group"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.name.as_str()];
        if let Some(group) = &self.group {
            fields.push(&group.name);
        }
        fields
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.day_number.to_string(),
            self.name.clone(),
            ref_name(&self.group),
        ]
    }
}

impl Editable for ProgramDay {
    type Input = ProgramDayInput;

    fn to_input(&self) -> ProgramDayInput {
        ProgramDayInput {
            name: self.name.clone(),
            day_number: self.day_number,
            group_id: self.group.as_ref().map(|g| g.id.clone()).unwrap_or_default(),
        }
    }
}

// =========================================================
// Commerce
// =========================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Promotion {
    pub id: String,
    pub code: String,
    pub discount_percent: f64,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionInput {
    pub code: String,
    pub discount_percent: f64,
    pub starts_on: NaiveDate,
    pub ends_on: NaiveDate,
    #[serde(default)]
    pub active: bool,
}

impl Entity for Promotion {
    const KIND: EntityKind = EntityKind::Promotion;
    const SELECTION: &'static str = "id code discountPercent startsOn endsOn active";
    const COLUMNS: &'static [&'static str] = &["Code", "Discount", "Starts", "Ends", "Active"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        vec![self.code.as_str()]
    }

    fn cells(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            format!("{}%", self.discount_percent),
            self.starts_on.to_string(),
            self.ends_on.to_string(),
            if self.active { "Yes" } else { "No" }.to_string(),
        ]
    }
}

impl Editable for Promotion {
    type Input = PromotionInput;

    fn to_input(&self) -> PromotionInput {
        PromotionInput {
            code: self.code.clone(),
            discount_percent: self.discount_percent,
            starts_on: self.starts_on,
            ends_on: self.ends_on,
            active: self.active,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Questionnaire {
    pub id: String,
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionnaireInput {
    pub question: String,
    #[serde(default)]
    pub answers: Vec<String>,
}

impl Entity for Questionnaire {
    const KIND: EntityKind = EntityKind::Questionnaire;
    const SELECTION: &'static str = "id question answers";
    const COLUMNS: &'static [&'static str] = &["Question", "Answers"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.question.as_str()];
        fields.extend(self.answers.iter().map(String::as_str));
        fields
    }

    fn cells(&self) -> Vec<String> {
        vec![self.question.clone(), self.answers.join(", ")]
    }
}

impl Editable for Questionnaire {
    type Input = QuestionnaireInput;

    fn to_input(&self) -> QuestionnaireInput {
        QuestionnaireInput {
            question: self.question.clone(),
            answers: self.answers.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    pub id: String,
    #[serde(default)]
    pub user: Option<EntityRef>,
    pub amount: f64,
    #[serde(default)]
    pub currency: Option<EntityRef>,
    pub issued_on: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceInput {
    pub user_id: String,
    pub amount: f64,
    pub currency_id: String,
    pub issued_on: NaiveDate,
}

impl Entity for Invoice {
    const KIND: EntityKind = EntityKind::Invoice;
    const SELECTION: &'static str = "id amount issuedOn user { id name } currency { id name }";
    const COLUMNS: &'static [&'static str] = &["User", "Amount", "Currency", "Issued"];

    fn id(&self) -> &str {
        &self.id
    }

    fn search_fields(&self) -> Vec<&str> {
        let mut fields = Vec::new();
        if let Some(user) = &self.user {
            fields.push(user.name.as_str());
        }
        fields
    }

    fn cells(&self) -> Vec<String> {
        vec![
            ref_name(&self.user),
            format!("{:.2}", self.amount),
            ref_name(&self.currency),
            self.issued_on.to_string(),
        ]
    }
}

impl Editable for Invoice {
    type Input = InvoiceInput;

    fn to_input(&self) -> InvoiceInput {
        InvoiceInput {
            user_id: self.user.as_ref().map(|u| u.id.clone()).unwrap_or_default(),
            amount: self.amount,
            currency_id: self.currency.as_ref().map(|c| c.id.clone()).unwrap_or_default(),
            issued_on: self.issued_on,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_base_roundtrip() {
        for kind in EntityKind::ALL {
            assert_eq!(EntityKind::from_route_base(kind.route_base()), Some(kind));
        }
        assert_eq!(EntityKind::from_route_base("/nope"), None);
    }

    #[test]
    fn test_graphql_field_names() {
        assert_eq!(EntityKind::MuscleGroup.detail_field(), "muscleGroup");
        assert_eq!(EntityKind::MuscleGroup.list_field(), "muscleGroups");
        assert_eq!(EntityKind::City.list_field(), "cities");
        assert_eq!(EntityKind::City.paged_field(), "paginatedCities");
        assert_eq!(EntityKind::Equipment.paged_field(), "paginatedEquipments");
    }

    #[test]
    fn test_city_search_fields_include_country() {
        let city = City {
            id: "1".into(),
            name: "Riyadh".into(),
            country: Some(EntityRef {
                id: "sa".into(),
                name: "Saudi Arabia".into(),
            }),
        };
        assert_eq!(city.search_fields(), vec!["Riyadh", "Saudi Arabia"]);
        assert_eq!(city.cells(), vec!["Riyadh", "Saudi Arabia"]);
    }
}
