//! Prompt templates and sampling parameters for each pipeline step

use crate::pipeline::types::{BlogContentItem, GenerationRequest};
use crate::provider::{ChatMessage, SamplingParams};

pub const KEYWORDS_PARAMS: SamplingParams = SamplingParams::new(0.8, 120, 0.8);
pub const TOPICS_PARAMS: SamplingParams = SamplingParams::new(0.8, 120, 0.8);
pub const OUTLINE_PARAMS: SamplingParams = SamplingParams::new(0.8, 400, 0.8);
pub const HEADINGS_PARAMS: SamplingParams = SamplingParams::new(0.8, 2048, 1.0);
pub const TITLE_PARAMS: SamplingParams = SamplingParams::new(0.5, 120, 1.0);
pub const PARAGRAPH_PARAMS: SamplingParams =
    SamplingParams::new(0.8, 200, 1.0).with_penalties(0.2, 0.4);
pub const META_PARAMS: SamplingParams = SamplingParams::new(0.5, 1024, 1.0);

/// Upper bound on post length given to the paragraph writer
pub const MAX_POST_WORDS: usize = 800;

fn bracketed(items: &[String]) -> String {
    format!("[{}]", items.join(","))
}

/// `prefix [a,b,c]` when the list is non-empty, otherwise nothing
fn list_clause(prefix: &str, items: &[String]) -> String {
    if items.is_empty() {
        String::new()
    } else {
        format!("{} {}", prefix, bracketed(items))
    }
}

pub fn keywords(broad_topic: &str, blog_title: Option<&str>, exclusions: &[String]) -> String {
    let title = blog_title
        .filter(|t| !t.trim().is_empty())
        .map(|t| format!("The title of the blog post is: {}. ", t))
        .unwrap_or_default();

    format!(
        "Generate diverse, relevant keywords for SEO optimization of a blog post on a given broad-topic. {}Your broad-topic is: {}. {}\n",
        title,
        broad_topic,
        list_clause("Please exclude any references to the following keywords:", exclusions),
    )
}

pub fn topics(broad_topic: &str, keywords: &[String], exclusions: &[String]) -> String {
    format!(
        "Generate a list of topics for a blog post on a given broad-topic. Your broad-topic is: {}. {} {}\n",
        broad_topic,
        list_clause(
            "Where relevant, relate the topic to a keyword from this list:",
            keywords
        ),
        list_clause("Please exclude any references to the following topics:", exclusions),
    )
}

pub fn outline(topic: &str, keywords: &[String]) -> String {
    format!(
        "Create a concise search engine optimised outline for a blog post on the topic of {}. \
         Your task is to generate a structured outline that covers key aspects of the subject matter. \
         Incorporate the following keywords into the outline to ensure comprehensive coverage: {}. \
         The outline should provide a clear flow of ideas and sections that engage readers and deliver valuable insights on the given topic.",
        topic,
        keywords.join(","),
    )
}

pub fn headings(outline: &str, topic: &str, title: &str, keywords: &[String]) -> String {
    format!(
        "Generate a list of headings and images for a blog post based on the given outline, topic and title. \
         The headings should accurately reflect the sections of the outline and provide a clear structure for the blog post, \
         and the images should accurately reflect the blog topic. \
         Your outline is: {}. Your topic is: {}. Your title is: {}. {}\n\
         Return a valid JSON array of objects. Each object represents a heading in the format:\n\
         [{{\"type\": \"<h2, h3 or image>\", \"content\": \"...\"}}, {{\"type\": \"image\", \"image_description\": \"...\"}}, ...]",
        outline,
        topic,
        title,
        list_clause("Where relevant, a heading must include a keyword from this list:", keywords),
    )
}

pub fn title(outline: &str, topic: &str, exclusions: &[String], features: &[String]) -> String {
    format!(
        "Generate a blog title for a blog post on a given outline and/or topic. Your outline is: {}. Your topic is: {}. {} {}\n",
        outline,
        topic,
        list_clause("Please exclude any references to the following topics:", exclusions),
        list_clause("Please include the following keywords:", features),
    )
}

/// Messages for the next paragraph of the post
///
/// The assistant message carries everything written so far, so each
/// paragraph depends on all earlier ones.
pub fn paragraph(
    heading: &str,
    part: usize,
    parts_length: usize,
    content: &[BlogContentItem],
    request: &GenerationRequest,
) -> Vec<ChatMessage> {
    let so_far = content
        .iter()
        .map(BlogContentItem::value)
        .collect::<Vec<_>>()
        .join("\n");
    let length = content
        .iter()
        .map(BlogContentItem::value)
        .collect::<Vec<_>>()
        .join(" ")
        .chars()
        .count();

    let system = format!(
        "You are a unique, personal and down to earth blog writer tasked with completing only the next sentence of a blog on the given topic: {}. \
         Overall the blog post should provide comprehensive coverage and optimal SEO by incorporating relevant keywords. \
         Ensure that each paragraph is informative but concise, delivers valuable insights, engages readers, and maintains a clear flow of ideas within the broader content. \
         Avoid duplicating sentences or ideas. Each paragraph must introduce new information or provide a different perspective.",
        request.topic,
    );

    let context = format!(
        "The blog is titled: {}\n\
         The current content of the blog you are being asked to finish is as follows:\n{}\n\
         {}\n\
         {}\n\
         This is part {} of {} of the blog post. The blog post must be a maximum of {} words and is currently {} characters long.",
        request.title.as_deref().unwrap_or_default(),
        so_far,
        list_clause("Excluded topics:", &request.exclusions),
        list_clause("Keywords:", &request.keywords),
        part + 1,
        parts_length,
        MAX_POST_WORDS,
        length,
    );

    let instruction = format!(
        "Write the next sentence or two for the section under a given heading. \
         Keep it under 50 words, entertaining, relevant to the keywords and heading and the context of where it resides in the article. \
         Your heading is: {}",
        heading,
    );

    vec![
        ChatMessage::system(system),
        ChatMessage::assistant(context),
        ChatMessage::user(instruction),
    ]
}

pub fn meta(title: &str, outline: &str, keywords: &[String], exclusions: &[String]) -> String {
    format!(
        "Generate a list of html meta data for a blog post on a given title and blog outline. Your title is: {title}.\n\
         Ensure that the meta description is concise, informative, and engaging. \
         Suggest any other meta tags that may be relevant to this blog post such as image tags or keywords.\n\
         You must reply with a JSON array in the following format:\n\
         [{{\"name\": \"title\", \"content\": \"{title}\"}}, {{\"name\": \"description\", \"content\": \"...\"}}, {{\"name\": \"keywords\", \"content\": \"...\"}}, ...]\n\
         The blog outline is: {outline}. {} {}\n",
        list_clause("Please exclude any references to the following topics:", exclusions),
        list_clause("Please use the following keywords where relevant:", keywords),
    )
}
