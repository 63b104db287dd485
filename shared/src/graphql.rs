//! GraphQL operation catalogue.
//!
//! Every call the console makes is described by a type implementing
//! [`GraphqlOperation`]: the document to send, the variables it takes and
//! the shape of the root field it returns.

use std::collections::BTreeMap;
use std::marker::PhantomData;

use serde::{Deserialize, Serialize, de::DeserializeOwned};

use crate::{DeviceInfo, Editable, Entity, UserProfile};

/// Query or mutation. Only queries are cached by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationKind {
    Query,
    Mutation,
}

/// A trait that defines the request-response relationship of one GraphQL operation.
pub trait GraphqlOperation {
    /// Variables sent with the document.
    type Variables: Serialize;
    /// Value of the root field in `data`.
    type Response: DeserializeOwned;

    const KIND: OperationKind;

    /// Operation name, also used as the cache namespace.
    fn name() -> String;
    /// Full GraphQL document.
    fn document() -> String;
    /// Root field to extract from `data`.
    fn root_field() -> String;
}

/// Operation without variables.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct NoVariables {}

// =========================================================
// List / detail
// =========================================================

/// Variables of a server-paginated list query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageArgs {
    pub size: u32,
    /// 1-based.
    pub page: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub filter: BTreeMap<String, String>,
}

/// One server-side page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Paged<T> {
    pub items: Vec<T>,
    pub total_pages: u32,
}

/// Variables addressing one record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IdArgs {
    pub id: String,
}

/// Variables of a create mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateArgs<I> {
    pub input: I,
}

/// Variables of an update mutation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateArgs<I> {
    pub id: String,
    pub input: I,
}

/// Server-paginated list: `paginatedCities(size, page, search, filter)`.
pub struct ListPage<E>(PhantomData<E>);

impl<E: Entity> GraphqlOperation for ListPage<E> {
    type Variables = PageArgs;
    type Response = Paged<E>;

    const KIND: OperationKind = OperationKind::Query;

    fn name() -> String {
        format!("List{}Page", E::KIND.type_name())
    }

    fn document() -> String {
        format!(
            "query {name}($size: Int!, $page: Int!, $search: String, $filter: JSON) {{ \
             {field}(size: $size, page: $page, search: $search, filter: $filter) {{ \
             items {{ {selection} }} totalPages }} }}",
            name = Self::name(),
            field = Self::root_field(),
            selection = E::SELECTION,
        )
    }

    fn root_field() -> String {
        E::KIND.paged_field()
    }
}

/// Whole collection, filtered and paginated in memory.
pub struct ListAll<E>(PhantomData<E>);

impl<E: Entity> GraphqlOperation for ListAll<E> {
    type Variables = NoVariables;
    type Response = Vec<E>;

    const KIND: OperationKind = OperationKind::Query;

    fn name() -> String {
        format!("List{}", E::KIND.type_name())
    }

    fn document() -> String {
        format!(
            "query {name} {{ {field} {{ {selection} }} }}",
            name = Self::name(),
            field = Self::root_field(),
            selection = E::SELECTION,
        )
    }

    fn root_field() -> String {
        E::KIND.list_field()
    }
}

/// One record by id, for detail and edit pages.
pub struct FindOne<E>(PhantomData<E>);

impl<E: Entity> GraphqlOperation for FindOne<E> {
    type Variables = IdArgs;
    type Response = E;

    const KIND: OperationKind = OperationKind::Query;

    fn name() -> String {
        format!("Find{}", E::KIND.type_name())
    }

    fn document() -> String {
        format!(
            "query {name}($id: ID!) {{ {field}(id: $id) {{ {selection} }} }}",
            name = Self::name(),
            field = Self::root_field(),
            selection = E::SELECTION,
        )
    }

    fn root_field() -> String {
        E::KIND.detail_field()
    }
}

// =========================================================
// Mutations
// =========================================================

pub struct Create<E>(PhantomData<E>);

impl<E: Editable> GraphqlOperation for Create<E> {
    type Variables = CreateArgs<E::Input>;
    type Response = E;

    const KIND: OperationKind = OperationKind::Mutation;

    fn name() -> String {
        format!("Create{}", E::KIND.type_name())
    }

    fn document() -> String {
        format!(
            "mutation {name}($input: {ty}Input!) {{ {field}(input: $input) {{ {selection} }} }}",
            name = Self::name(),
            ty = E::KIND.type_name(),
            field = Self::root_field(),
            selection = E::SELECTION,
        )
    }

    fn root_field() -> String {
        format!("create{}", E::KIND.type_name())
    }
}

pub struct Update<E>(PhantomData<E>);

impl<E: Editable> GraphqlOperation for Update<E> {
    type Variables = UpdateArgs<E::Input>;
    type Response = E;

    const KIND: OperationKind = OperationKind::Mutation;

    fn name() -> String {
        format!("Update{}", E::KIND.type_name())
    }

    fn document() -> String {
        format!(
            "mutation {name}($id: ID!, $input: {ty}Input!) {{ \
             {field}(id: $id, input: $input) {{ {selection} }} }}",
            name = Self::name(),
            ty = E::KIND.type_name(),
            field = Self::root_field(),
            selection = E::SELECTION,
        )
    }

    fn root_field() -> String {
        format!("update{}", E::KIND.type_name())
    }
}

// =========================================================
// Authentication
// =========================================================

const PROFILE_SELECTION: &str = "id name email adminRoles";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginArgs {
    pub email: String,
    pub password: String,
    pub device: DeviceInfo,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginPayload {
    pub access_token: String,
    pub user: UserProfile,
}

/// Credentials sign-in.
pub struct Login;

impl GraphqlOperation for Login {
    type Variables = LoginArgs;
    type Response = LoginPayload;

    const KIND: OperationKind = OperationKind::Mutation;

    fn name() -> String {
        "Login".to_string()
    }

    fn document() -> String {
        format!(
            "mutation Login($email: String!, $password: String!, $device: DeviceInput!) {{ \
             login(email: $email, password: $password, device: $device) {{ \
             accessToken user {{ {PROFILE_SELECTION} }} }} }}"
        )
    }

    fn root_field() -> String {
        "login".to_string()
    }
}

/// "Who am I" for the bearer token in the cookie.
pub struct Me;

impl GraphqlOperation for Me {
    type Variables = NoVariables;
    type Response = UserProfile;

    const KIND: OperationKind = OperationKind::Query;

    fn name() -> String {
        "Me".to_string()
    }

    fn document() -> String {
        format!("query Me {{ me {{ {PROFILE_SELECTION} }} }}")
    }

    fn root_field() -> String {
        "me".to_string()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterArgs {
    pub input: RegisterInput,
}

/// Administrator self sign-up.
pub struct Register;

impl GraphqlOperation for Register {
    type Variables = RegisterArgs;
    type Response = UserProfile;

    const KIND: OperationKind = OperationKind::Mutation;

    fn name() -> String {
        "Register".to_string()
    }

    fn document() -> String {
        format!(
            "mutation Register($input: RegisterInput!) {{ \
             register(input: $input) {{ {PROFILE_SELECTION} }} }}"
        )
    }

    fn root_field() -> String {
        "register".to_string()
    }
}
