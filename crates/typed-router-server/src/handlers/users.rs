//! User CRUD handlers.

use axum::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use axum::http::StatusCode;
use typed_router::{ResponseWriter, RouteError, TypedRequest};

use crate::error::AppError;
use crate::schema::users::{
    CreateUserRequest, DeleteUserResponse, ListUsersResponse, UpdateUserRequest, User,
};
use crate::schema::{CreateUser, DeleteUser, ExportUser, GetUser, ListUsers, ReplaceUser, UpdateUser};
use crate::state::AppState;

/// Accepts `local@domain.tld` with no whitespace and exactly one `@`.
fn validate_email(email: &str) -> Result<(), AppError> {
    let invalid = || AppError::Validation("invalid email".to_string());
    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    let well_formed = !local.is_empty()
        && !domain.contains('@')
        && domain
            .split_once('.')
            .is_some_and(|(host, tld)| !host.is_empty() && !tld.is_empty());
    if well_formed {
        Ok(())
    } else {
        Err(invalid())
    }
}

fn validate_name(name: &str) -> Result<(), AppError> {
    if name.trim().is_empty() {
        return Err(AppError::Validation("name must not be empty".to_string()));
    }
    Ok(())
}

/// `GET /users`
pub async fn list_users(
    req: TypedRequest<ListUsers, AppState>,
) -> Result<ListUsersResponse, RouteError> {
    let users = req
        .state
        .users
        .list(req.query.name.as_deref(), req.query.limit);
    Ok(ListUsersResponse {
        total: users.len(),
        users,
    })
}

/// `POST /users`
pub async fn create_user(req: TypedRequest<CreateUser, AppState>) -> Result<User, RouteError> {
    let CreateUserRequest { name, email } = req.body;
    validate_email(&email)?;
    validate_name(&name)?;

    let user = req.state.users.create(name, email)?;
    tracing::info!(user_id = %user.id, "created user");
    Ok(user)
}

/// `GET /users/{id}`
pub async fn get_user(req: TypedRequest<GetUser, AppState>) -> Result<User, RouteError> {
    Ok(req.state.users.get(&req.params.id)?)
}

/// `PUT /users/{id}`
pub async fn replace_user(req: TypedRequest<ReplaceUser, AppState>) -> Result<User, RouteError> {
    let CreateUserRequest { name, email } = req.body;
    validate_email(&email)?;
    validate_name(&name)?;

    Ok(req
        .state
        .users
        .update(&req.params.id, Some(name), Some(email))?)
}

/// `PATCH /users/{id}`
pub async fn update_user(req: TypedRequest<UpdateUser, AppState>) -> Result<User, RouteError> {
    let UpdateUserRequest { name, email } = req.body;
    if let Some(name) = &name {
        validate_name(name)?;
    }
    if let Some(email) = &email {
        validate_email(email)?;
    }

    Ok(req.state.users.update(&req.params.id, name, email)?)
}

/// `DELETE /users/{id}`
pub async fn delete_user(
    req: TypedRequest<DeleteUser, AppState>,
) -> Result<DeleteUserResponse, RouteError> {
    let user = req.state.users.delete(&req.params.id)?;
    tracing::info!(user_id = %user.id, "deleted user");
    Ok(DeleteUserResponse {
        success: true,
        id: user.id,
    })
}

/// `GET /users/{id}/export`
///
/// Writes a one-row CSV attachment through the response writer.
pub async fn export_user(
    req: TypedRequest<ExportUser, AppState>,
    res: ResponseWriter,
) -> Result<(), RouteError> {
    let user = req.state.users.get(&req.params.id)?;
    let csv = format!("id,name,email\n{},{},{}\n", user.id, user.name, user.email);
    res.send((
        StatusCode::OK,
        [
            (CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"user-{}.csv\"", user.id),
            ),
        ],
        csv,
    ));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(validate_email("ada@example.com").is_ok());
        assert!(validate_email("a.b+c@mail.example.org").is_ok());
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in ["not-an-email", "@example.com", "ada@", "ada@example", "a@b@c.d", "ada @x.io"] {
            assert_eq!(
                validate_email(email),
                Err(AppError::Validation("invalid email".to_string())),
                "{email}"
            );
        }
    }
}
