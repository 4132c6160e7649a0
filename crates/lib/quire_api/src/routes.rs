//! Route paths.

pub const GET_HEALTH: &str = "/health";

pub const POST_REGISTER: &str = "/register";
pub const POST_LOGIN: &str = "/login";
pub const POST_REFRESH: &str = "/refresh";
pub const POST_LOGOUT: &str = "/logout";

pub const USERS: &str = "/users";
pub const USERS_ID: &str = "/users/{id}";
pub const PATCH_USERS_ID_PASSWORD: &str = "/users/{id}/password";
pub const PATCH_USERS_ID_ROLE: &str = "/users/{id}/role";
pub const GET_USERS_ID_POSTS: &str = "/users/{id}/posts";

pub const POSTS: &str = "/posts";
pub const POSTS_ID: &str = "/posts/{id}";
pub const POSTS_ID_COMMENTS: &str = "/posts/{id}/comments";

pub const CATEGORIES: &str = "/categories";
pub const CATEGORIES_ID: &str = "/categories/{id}";
pub const GET_CATEGORIES_ID_POSTS: &str = "/categories/{id}/posts";

pub const GET_COMMENTS: &str = "/comments";
pub const COMMENTS_ID: &str = "/comments/{id}";
