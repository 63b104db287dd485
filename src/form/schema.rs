use zatca_shared::EntityKind;

use super::{FieldKind, FieldSpec, FormSchema};

const fn field(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: false,
    }
}

const fn required(name: &'static str, label: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec {
        name,
        label,
        kind,
        required: true,
    }
}

static COUNTRY: FormSchema = FormSchema {
    kind: EntityKind::Country,
    noun: "Country",
    fields: &[
        required("name", "Name", FieldKind::Text),
        required("code", "Code", FieldKind::Text),
        field("phoneCode", "Phone code", FieldKind::Text),
        field("flag", "Flag", FieldKind::Image),
    ],
};

static CITY: FormSchema = FormSchema {
    kind: EntityKind::City,
    noun: "City",
    fields: &[
        required("name", "Name", FieldKind::Text),
        required("countryId", "Country", FieldKind::Select(EntityKind::Country)),
    ],
};

static CURRENCY: FormSchema = FormSchema {
    kind: EntityKind::Currency,
    noun: "Currency",
    fields: &[
        required("name", "Name", FieldKind::Text),
        required("code", "Code", FieldKind::Text),
        field("symbol", "Symbol", FieldKind::Text),
    ],
};

static LANGUAGE: FormSchema = FormSchema {
    kind: EntityKind::Language,
    noun: "Language",
    fields: &[
        required("name", "Name", FieldKind::Text),
        required("code", "Code", FieldKind::Text),
    ],
};

static USER: FormSchema = FormSchema {
    kind: EntityKind::User,
    noun: "User",
    fields: &[
        required("firstName", "First name", FieldKind::Text),
        required("lastName", "Last name", FieldKind::Text),
        required("email", "E-mail", FieldKind::Email),
        field("phone", "Phone", FieldKind::Text),
        required("userTypeId", "User type", FieldKind::Select(EntityKind::UserType)),
    ],
};

static USER_TYPE: FormSchema = FormSchema {
    kind: EntityKind::UserType,
    noun: "User type",
    fields: &[required("name", "Name", FieldKind::Text)],
};

static MUSCLE_GROUP: FormSchema = FormSchema {
    kind: EntityKind::MuscleGroup,
    noun: "Muscle group",
    fields: &[
        required("name", "Name", FieldKind::Text),
        field("image", "Image", FieldKind::Image),
    ],
};

static EQUIPMENT: FormSchema = FormSchema {
    kind: EntityKind::Equipment,
    noun: "Equipment",
    fields: &[
        required("name", "Name", FieldKind::Text),
        field("image", "Image", FieldKind::Image),
    ],
};

static EXERCISE: FormSchema = FormSchema {
    kind: EntityKind::Exercise,
    noun: "Exercise",
    fields: &[
        required("name", "Name", FieldKind::Text),
        field("description", "Description", FieldKind::Text),
        required(
            "muscleGroupId",
            "Muscle group",
            FieldKind::Select(EntityKind::MuscleGroup),
        ),
        field("image", "Image", FieldKind::Image),
        field("video", "Video", FieldKind::Video),
    ],
};

static WORKOUT_CATEGORY: FormSchema = FormSchema {
    kind: EntityKind::WorkoutCategory,
    noun: "Workout category",
    fields: &[
        required("name", "Name", FieldKind::Text),
        field("image", "Image", FieldKind::Image),
    ],
};

static WORKOUT_GROUP: FormSchema = FormSchema {
    kind: EntityKind::WorkoutGroup,
    noun: "Workout group",
    fields: &[
        required("name", "Name", FieldKind::Text),
        required(
            "categoryId",
            "Category",
            FieldKind::Select(EntityKind::WorkoutCategory),
        ),
    ],
};

static PROGRAM_DAY: FormSchema = FormSchema {
    kind: EntityKind::ProgramDay,
    noun: "Programme day",
    fields: &[
        required("name", "Name", FieldKind::Text),
        required("dayNumber", "Day", FieldKind::Integer),
        required("groupId", "Group", FieldKind::Select(EntityKind::WorkoutGroup)),
    ],
};

static PROMOTION: FormSchema = FormSchema {
    kind: EntityKind::Promotion,
    noun: "Promotion",
    fields: &[
        required("code", "Code", FieldKind::Text),
        required("discountPercent", "Discount (%)", FieldKind::Number),
        required("startsOn", "Starts on", FieldKind::Date),
        required("endsOn", "Ends on", FieldKind::Date),
        field("active", "Active", FieldKind::Boolean),
    ],
};

static QUESTIONNAIRE: FormSchema = FormSchema {
    kind: EntityKind::Questionnaire,
    noun: "Questionnaire",
    fields: &[
        required("question", "Question", FieldKind::Text),
        required("answers", "Answers", FieldKind::List),
    ],
};

static INVOICE: FormSchema = FormSchema {
    kind: EntityKind::Invoice,
    noun: "Invoice",
    fields: &[
        required("userId", "User", FieldKind::Select(EntityKind::User)),
        required("amount", "Amount", FieldKind::Number),
        required("currencyId", "Currency", FieldKind::Select(EntityKind::Currency)),
        required("issuedOn", "Issued on", FieldKind::Date),
    ],
};

/// Form definition of an entity.
pub fn schema_for(kind: EntityKind) -> &'static FormSchema {
    match kind {
        EntityKind::Country => &COUNTRY,
        EntityKind::City => &CITY,
        EntityKind::Currency => &CURRENCY,
        EntityKind::Language => &LANGUAGE,
        EntityKind::User => &USER,
        EntityKind::UserType => &USER_TYPE,
        EntityKind::MuscleGroup => &MUSCLE_GROUP,
        EntityKind::Equipment => &EQUIPMENT,
        EntityKind::Exercise => &EXERCISE,
        EntityKind::WorkoutCategory => &WORKOUT_CATEGORY,
        EntityKind::WorkoutGroup => &WORKOUT_GROUP,
        EntityKind::ProgramDay => &PROGRAM_DAY,
        EntityKind::Promotion => &PROMOTION,
        EntityKind::Questionnaire => &QUESTIONNAIRE,
        EntityKind::Invoice => &INVOICE,
    }
}
