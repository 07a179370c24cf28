pub mod draft;
pub mod error;
pub mod events;
pub mod rest_api;
pub mod state;
pub mod validate;

#[macro_export]
macro_rules! repository_from_request {
    ($repo:ty, $getter:ident) => {
        impl axum::extract::FromRequestParts<$crate::state::AppState> for $repo {
            type Rejection = http::StatusCode;

            fn from_request_parts(
                _parts: &mut http::request::Parts,
                state: &$crate::state::AppState,
            ) -> impl std::future::Future<Output = std::result::Result<Self, Self::Rejection>>
                   + core::marker::Send {
                futures::future::ready(std::result::Result::Ok(state.$getter().clone()))
            }
        }
    };
}

repository_from_request!(figures_dal::character::CharacterRepository, characters);
repository_from_request!(draft::Drafts, drafts);
