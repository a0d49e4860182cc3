use crate::{
    auth::{hash_password, verify_password, AuthConfig, AuthError, TokenIssuer, TokenKind, TokenPair},
    entities::{
        user::{self, Entity as UserEntity, Model as UserModel},
        Customer, CustomerModel, SalesRep, SalesRepModel,
    },
    errors::ServiceError,
    services::{fetch_page, find_by_id, DeleteResponse, ListQuery, Page},
    validation::{FieldKind, FieldSpec, RequestSchema},
};
use chrono::NaiveDate;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, ModelTrait,
    QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, instrument, warn};
use validator::Validate;

#[derive(Clone)]
pub struct UserService {
    db: Arc<DatabaseConnection>,
    tokens: TokenIssuer,
}

impl UserService {
    pub fn new(db: Arc<DatabaseConnection>, auth: AuthConfig) -> Self {
        Self {
            db,
            tokens: TokenIssuer::new(auth),
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &ListQuery) -> Result<Page<UserModel>, ServiceError> {
        let mut select = UserEntity::find().order_by_asc(user::Column::Id);
        if let Some(user_type_id) = query.user_type_id {
            select = select.filter(user::Column::UserTypeId.eq(user_type_id));
        }
        if let Some(term) = query.search_term() {
            select = select.filter(
                Condition::any()
                    .add(user::Column::Name.contains(term))
                    .add(user::Column::Username.contains(term))
                    .add(user::Column::UserCode.contains(term)),
            );
        }
        fetch_page(&self.db, select, query).await
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: i32) -> Result<UserModel, ServiceError> {
        find_by_id::<UserEntity>(&self.db, id, "User").await
    }

    pub async fn find_by_code(&self, user_code: &str) -> Result<Option<UserModel>, ServiceError> {
        Ok(UserEntity::find()
            .filter(user::Column::UserCode.eq(user_code))
            .one(&*self.db)
            .await?)
    }

    #[instrument(skip(self, input), fields(user_code = %input.user_code))]
    pub async fn create(&self, input: CreateUserInput) -> Result<UserModel, ServiceError> {
        let password = hash_password(&input.password)?;

        let model = user::ActiveModel {
            user_code: Set(input.user_code),
            user_type_id: Set(input.user_type_id),
            username: Set(input.username),
            password: Set(password),
            name: Set(input.name),
            address: Set(input.address),
            email: Set(input.email),
            dob: Set(input.dob),
            contact: Set(input.contact),
            ..Default::default()
        }
        .insert(&*self.db)
        .await?;

        info!(id = model.id, "user created");
        Ok(model)
    }

    #[instrument(skip(self, input))]
    pub async fn update(&self, id: i32, input: UpdateUserInput) -> Result<UserModel, ServiceError> {
        let mut model: user::ActiveModel = self.get(id).await?.into();

        if let Some(user_code) = input.user_code {
            model.user_code = Set(user_code);
        }
        if let Some(user_type_id) = input.user_type_id {
            model.user_type_id = Set(user_type_id);
        }
        if let Some(username) = input.username {
            model.username = Set(username);
        }
        if let Some(password) = input.password {
            model.password = Set(hash_password(&password)?);
        }
        if let Some(name) = input.name {
            model.name = Set(name);
        }
        if let Some(address) = input.address {
            model.address = Set(Some(address));
        }
        if let Some(email) = input.email {
            model.email = Set(Some(email));
        }
        if let Some(dob) = input.dob {
            model.dob = Set(Some(dob));
        }
        if let Some(contact) = input.contact {
            model.contact = Set(Some(contact));
        }

        Ok(model.update(&*self.db).await?)
    }

    /// Deletes a user; the store cascades its customers and clears the
    /// `emp_code` of linked sales reps and accountants.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i32) -> Result<DeleteResponse, ServiceError> {
        let model = self.get(id).await?;
        model.delete(&*self.db).await?;
        info!(id, "user deleted");
        Ok(DeleteResponse::new(id))
    }

    /// Customers owned by a user, by `user_code`.
    #[instrument(skip(self))]
    pub async fn customers(&self, id: i32) -> Result<Vec<CustomerModel>, ServiceError> {
        let user = self.get(id).await?;
        Ok(user
            .find_related(Customer)
            .all(&*self.db)
            .await?)
    }

    #[instrument(skip(self))]
    pub async fn sales_reps(&self, id: i32) -> Result<Vec<SalesRepModel>, ServiceError> {
        let user = self.get(id).await?;
        Ok(user.find_related(SalesRep).all(&*self.db).await?)
    }

    #[instrument(skip(self, input), fields(username = %input.username))]
    pub async fn login(&self, input: LoginInput) -> Result<LoginResponse, ServiceError> {
        let user = UserEntity::find()
            .filter(user::Column::Username.eq(&input.username))
            .one(&*self.db)
            .await?;

        let user = match user {
            Some(user) if verify_password(&input.password, &user.password) => user,
            _ => {
                warn!("login rejected");
                return Err(AuthError::InvalidCredentials.into());
            }
        };

        let tokens = self
            .tokens
            .issue(&user.user_code, &user.username, user.user_type_id)?;
        info!(user_code = %user.user_code, "login succeeded");
        Ok(LoginResponse { user, tokens })
    }

    /// Exchanges a refresh token for a new pair, provided the user still exists.
    #[instrument(skip(self, input))]
    pub async fn refresh(&self, input: RefreshInput) -> Result<TokenPair, ServiceError> {
        let claims = self.tokens.validate(&input.refresh_token, TokenKind::Refresh)?;
        let user = self
            .find_by_code(&claims.sub)
            .await?
            .ok_or(AuthError::InvalidToken)?;
        Ok(self
            .tokens
            .issue(&user.user_code, &user.username, user.user_type_id)?)
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, max = 20))]
    pub user_code: String,
    pub user_type_id: i32,
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    pub address: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    #[validate(length(max = 20))]
    pub contact: Option<String>,
}

impl RequestSchema for CreateUserInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("user_code", FieldKind::NonEmptyString),
        FieldSpec::required("user_type_id", FieldKind::Integer),
        FieldSpec::required("username", FieldKind::NonEmptyString),
        FieldSpec::required("password", FieldKind::NonEmptyString),
        FieldSpec::required("name", FieldKind::NonEmptyString),
        FieldSpec::optional("address", FieldKind::String),
        FieldSpec::optional("email", FieldKind::String),
        FieldSpec::optional("dob", FieldKind::Date),
        FieldSpec::optional("contact", FieldKind::String),
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, max = 20))]
    pub user_code: Option<String>,
    pub user_type_id: Option<i32>,
    #[validate(length(min = 3, max = 50))]
    pub username: Option<String>,
    #[validate(length(min = 8, message = "must be at least 8 characters"))]
    pub password: Option<String>,
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    pub address: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    pub dob: Option<NaiveDate>,
    #[validate(length(max = 20))]
    pub contact: Option<String>,
}

impl RequestSchema for UpdateUserInput {
    const FIELDS: &'static [FieldSpec] = CreateUserInput::FIELDS;
    const PARTIAL: bool = true;
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

impl RequestSchema for LoginInput {
    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::required("username", FieldKind::NonEmptyString),
        FieldSpec::required("password", FieldKind::NonEmptyString),
    ];
}

#[derive(Debug, Deserialize, Validate)]
pub struct RefreshInput {
    pub refresh_token: String,
}

impl RequestSchema for RefreshInput {
    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("refresh_token", FieldKind::NonEmptyString)];
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: UserModel,
    pub tokens: TokenPair,
}
