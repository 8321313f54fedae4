//! Blog writer
//!
//! Runs the individual generation steps and chains them into a full post.

use std::future::Future;
use std::sync::Arc;
use std::time::Instant;

use rand::seq::IndexedRandom;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::{
    error::{AppError, AppResult},
    pipeline::{
        parse, prompts,
        types::{BlogContent, BlogContentItem, BlogPost, GenerationRequest, Heading, MetaTag},
    },
    provider::{ImageSource, SamplingParams, TextGenerator},
    routes::metrics::{record_parse_retry, record_step},
};

/// Time a step and record its outcome
async fn timed<T, F>(step: &'static str, future: F) -> AppResult<T>
where
    F: Future<Output = AppResult<T>>,
{
    let start = Instant::now();
    let result = future.await;
    let outcome = if result.is_ok() { "success" } else { "error" };
    record_step(step, outcome, start.elapsed().as_secs_f64());
    result
}

/// Orchestrates calls to the text generator and image source
pub struct BlogWriter {
    generator: Arc<dyn TextGenerator>,
    images: Arc<dyn ImageSource>,
    max_parse_attempts: u32,
}

impl BlogWriter {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        images: Arc<dyn ImageSource>,
        max_parse_attempts: u32,
    ) -> Self {
        Self {
            generator,
            images,
            max_parse_attempts: max_parse_attempts.max(1),
        }
    }

    /// Ask for a JSON array, calling again while the answer does not parse
    ///
    /// Gives up with `UpstreamParseFailure` after `max_parse_attempts` calls.
    /// Provider errors are returned immediately.
    async fn complete_json<T: DeserializeOwned>(
        &self,
        step: &'static str,
        prompt: &str,
        params: &SamplingParams,
    ) -> AppResult<Vec<T>> {
        for attempt in 1..=self.max_parse_attempts {
            let text = self.generator.complete(prompt, params).await?;
            match parse::parse_json_array(&text) {
                Ok(items) => return Ok(items),
                Err(e) => {
                    warn!(
                        step,
                        attempt,
                        max_attempts = self.max_parse_attempts,
                        error = %e,
                        "Response is not a valid JSON array"
                    );
                    if attempt < self.max_parse_attempts {
                        record_parse_retry(step);
                    }
                }
            }
        }

        Err(AppError::UpstreamParseFailure {
            step,
            attempts: self.max_parse_attempts,
        })
    }

    /// Keyword research for a broad topic
    #[instrument(skip(self, exclusions))]
    pub async fn keyword_research(
        &self,
        broad_topic: &str,
        blog_title: Option<&str>,
        exclusions: &[String],
    ) -> AppResult<Vec<String>> {
        timed("keywords", async {
            let prompt = prompts::keywords(broad_topic, blog_title, exclusions);
            let text = self
                .generator
                .complete(&prompt, &prompts::KEYWORDS_PARAMS)
                .await?;
            Ok(parse::parse_list(&text))
        })
        .await
    }

    /// Candidate topics for a broad topic
    #[instrument(skip(self, keywords, exclusions))]
    pub async fn generate_topics(
        &self,
        broad_topic: &str,
        keywords: &[String],
        exclusions: &[String],
    ) -> AppResult<Vec<String>> {
        timed("topics", async {
            let prompt = prompts::topics(broad_topic, keywords, exclusions);
            let text = self
                .generator
                .complete(&prompt, &prompts::TOPICS_PARAMS)
                .await?;
            Ok(parse::parse_list(&text))
        })
        .await
    }

    /// Free-text outline for a topic
    #[instrument(skip(self, keywords))]
    pub async fn generate_outline(&self, topic: &str, keywords: &[String]) -> AppResult<String> {
        timed("outline", async {
            let prompt = prompts::outline(topic, keywords);
            let text = self
                .generator
                .complete(&prompt, &prompts::OUTLINE_PARAMS)
                .await?;
            Ok(parse::parse_text(&text))
        })
        .await
    }

    /// Headings and image placeholders derived from an outline
    #[instrument(skip(self, outline, keywords))]
    pub async fn generate_headings(
        &self,
        outline: &str,
        topic: &str,
        title: &str,
        keywords: &[String],
    ) -> AppResult<Vec<Heading>> {
        timed("headings", async {
            let prompt = prompts::headings(outline, topic, title, keywords);
            self.complete_json("headings", &prompt, &prompts::HEADINGS_PARAMS)
                .await
        })
        .await
    }

    /// Title for an outline and topic
    #[instrument(skip(self, outline, exclusions, features))]
    pub async fn generate_title(
        &self,
        outline: &str,
        topic: &str,
        exclusions: &[String],
        features: &[String],
    ) -> AppResult<String> {
        timed("title", async {
            let prompt = prompts::title(outline, topic, exclusions, features);
            let text = self
                .generator
                .complete(&prompt, &prompts::TITLE_PARAMS)
                .await?;
            Ok(parse::parse_title(&text))
        })
        .await
    }

    /// Next paragraph for `heading`, written in the context of `content`
    #[instrument(skip(self, content, request), fields(context_items = content.len()))]
    pub async fn generate_paragraph(
        &self,
        heading: &str,
        part: usize,
        parts_length: usize,
        content: &[BlogContentItem],
        request: &GenerationRequest,
    ) -> AppResult<String> {
        timed("paragraph", async {
            let messages = prompts::paragraph(heading, part, parts_length, content, request);
            let text = self
                .generator
                .chat(&messages, &prompts::PARAGRAPH_PARAMS)
                .await?;
            let paragraph = parse::parse_text(&text);
            debug!(words = paragraph.split_whitespace().count(), "Generated paragraph");
            Ok(paragraph)
        })
        .await
    }

    /// Image URL for a description
    #[instrument(skip(self))]
    pub async fn generate_image(&self, description: &str) -> AppResult<String> {
        timed("image", self.images.resolve(description)).await
    }

    /// Meta tag suggestions for a post
    #[instrument(skip(self, outline, keywords, exclusions))]
    pub async fn generate_meta(
        &self,
        title: &str,
        outline: &str,
        keywords: &[String],
        exclusions: &[String],
    ) -> AppResult<Vec<MetaTag>> {
        timed("meta", async {
            let prompt = prompts::meta(title, outline, keywords, exclusions);
            self.complete_json("meta", &prompt, &prompts::META_PARAMS)
                .await
        })
        .await
    }

    /// Walk the headings in order, producing the post body
    ///
    /// A title item opens the post. Each text heading adds a heading item and
    /// a paragraph written with everything before it as context; each image
    /// heading adds a caption and the resolved image URL.
    #[instrument(skip_all, fields(headings = headings.len()))]
    pub async fn assemble_content(
        &self,
        headings: &[Heading],
        request: &GenerationRequest,
    ) -> AppResult<Vec<BlogContentItem>> {
        let mut content = Vec::with_capacity(1 + headings.len() * 2);
        if headings.is_empty() {
            return Ok(content);
        }

        content.push(BlogContentItem::Title {
            value: request.title.clone().unwrap_or_default(),
        });

        for (index, heading) in headings.iter().enumerate() {
            debug!(index, heading = heading.label(), "Generating section");
            match heading {
                Heading::Image { description } => {
                    let url = self.generate_image(description).await?;
                    content.push(BlogContentItem::Caption {
                        value: description.clone(),
                    });
                    content.push(BlogContentItem::Image { value: url });
                }
                Heading::Heading { level, text } => {
                    let paragraph = self
                        .generate_paragraph(text, index, headings.len(), &content, request)
                        .await?;
                    content.push(BlogContentItem::Heading {
                        level: level.clone(),
                        value: text.clone(),
                    });
                    content.push(BlogContentItem::Paragraph { value: paragraph });
                }
            }
        }

        Ok(content)
    }

    /// Run every step for a broad topic
    #[instrument(skip(self, exclusions))]
    pub async fn generate_by_broad_topic(
        &self,
        broad_topic: &str,
        exclusions: &[String],
    ) -> AppResult<BlogPost> {
        info!(provider = self.generator.name(), "Generating blog post");

        let keywords = self.keyword_research(broad_topic, None, exclusions).await?;
        info!(count = keywords.len(), "Keywords generated");

        let topics = self.generate_topics(broad_topic, &keywords, exclusions).await?;
        let topic = topics
            .choose(&mut rand::rng())
            .cloned()
            .unwrap_or_else(|| {
                warn!("No topics generated, falling back to the broad topic");
                broad_topic.to_string()
            });
        info!(topic = %topic, "Topic selected");

        let outline = self.generate_outline(&topic, &keywords).await?;
        info!("Outline generated");

        let title = self
            .generate_title(&outline, &topic, exclusions, &keywords)
            .await?;
        info!(title = %title, "Title generated");

        let headings = self
            .generate_headings(&outline, &topic, &title, &keywords)
            .await?;
        info!(count = headings.len(), "Headings generated");

        let request = GenerationRequest {
            topic: topic.clone(),
            title: Some(title.clone()),
            keywords: keywords.clone(),
            exclusions: exclusions.to_vec(),
        };
        let blog_content = self.assemble_content(&headings, &request).await?;
        info!(items = blog_content.len(), "Content generated");

        let meta = self
            .generate_meta(&title, &outline, &keywords, exclusions)
            .await?;
        info!(count = meta.len(), "Meta generated");

        Ok(BlogPost {
            title,
            meta,
            content: BlogContent { blog_content },
            keywords,
            topic,
            outline,
        })
    }
}
