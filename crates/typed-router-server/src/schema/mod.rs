//! API contract and schema types.
//!
//! [`UsersApi`] is the route contract the router binds against; each route
//! type names the request and response shapes defined in [`users`].

pub mod users;

use users::{
    CreateUserRequest, DeleteUserResponse, HealthResponse, ListUsersQuery, ListUsersResponse,
    UpdateUserRequest, User, UserParams,
};

typed_router::api_contract! {
    /// The users service API.
    pub contract UsersApi {
        /// `GET /health`
        Health: GET "/health" {
            response: HealthResponse,
        }
        /// `HEAD /health`
        HealthProbe: HEAD "/health" {
            response: (),
        }
        /// `GET /users`
        ListUsers: GET "/users" {
            query: ListUsersQuery,
            response: ListUsersResponse,
        }
        /// `POST /users`
        CreateUser: POST "/users" {
            body: CreateUserRequest,
            response: User,
        }
        /// `GET /users/{id}`
        GetUser: GET "/users/{id}" {
            params: UserParams,
            response: User,
        }
        /// `PUT /users/{id}`
        ReplaceUser: PUT "/users/{id}" {
            params: UserParams,
            body: CreateUserRequest,
            response: User,
        }
        /// `PATCH /users/{id}`
        UpdateUser: PATCH "/users/{id}" {
            params: UserParams,
            body: UpdateUserRequest,
            response: User,
        }
        /// `DELETE /users/{id}`
        DeleteUser: DELETE "/users/{id}" {
            params: UserParams,
            response: DeleteUserResponse,
        }
        /// `GET /users/{id}/export`, written directly as CSV.
        ExportUser: GET "/users/{id}/export" {
            params: UserParams,
            response: (),
        }
    }
}
