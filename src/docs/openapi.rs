//! OpenAPI specification for the Blogsmith API

use utoipa::{
    openapi::security::{ApiKey, ApiKeyValue, SecurityScheme},
    Modify, OpenApi,
};

use crate::{
    error::{ErrorBody, ErrorResponse},
    pipeline::{BlogContent, BlogContentItem, BlogPost, Heading, MetaTag},
    routes::{
        blog::BlogContentRequest,
        generate::{
            HeadingsRequest, KeywordResearchRequest, MetaRequest, MetaSource, OutlineRequest,
            ParagraphRequest, TitleRequest, TopicsRequest,
        },
        keys::ApiKeyResponse,
    },
};

/// OpenAPI specification for the Blogsmith API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Blogsmith API",
        version = "1.0.0",
        description = "Blog post generation: keywords, topics, outline, title, headings, paragraphs, images and meta tags"
    ),
    paths(
        crate::routes::keys::get_api_key,
        crate::routes::generate::keyword_research,
        crate::routes::generate::topics,
        crate::routes::generate::outline,
        crate::routes::generate::title,
        crate::routes::generate::headings,
        crate::routes::generate::paragraph,
        crate::routes::generate::meta,
        crate::routes::blog::blog_content,
        crate::routes::blog::by_broad_topic,
    ),
    components(
        schemas(
            // Pipeline
            Heading,
            BlogContentItem,
            BlogContent,
            MetaTag,
            BlogPost,
            // Requests
            KeywordResearchRequest,
            TopicsRequest,
            OutlineRequest,
            TitleRequest,
            HeadingsRequest,
            ParagraphRequest,
            MetaSource,
            MetaRequest,
            BlogContentRequest,
            // Responses
            ApiKeyResponse,
            ErrorResponse,
            ErrorBody,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Keys", description = "API key issuance"),
        (name = "Pipeline", description = "Blog generation steps")
    )
)]
pub struct ApiDoc;

/// Security scheme for the session-bound key in the Authorization header
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "api_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new("Authorization"))),
            );
        }
    }
}
