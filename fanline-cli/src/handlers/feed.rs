//! Feed handlers.

use anyhow::Result;
use chrono::{DateTime, Utc};
use colored::Colorize;
use fanline::{FanClient, FeedPost, FeedSession, IdentityContext, PageOutcome};
use serde::Serialize;

use crate::output::{format_relative_time, PlainPrint, TableRow};

/// Feed post info.
#[derive(Debug, Clone, Serialize)]
pub struct PostInfo {
    pub id: String,
    pub author: String,
    pub category: String,
    pub title: String,
    pub excerpt: String,
    pub tier: String,
    pub locked: bool,
    pub likes: u32,
    pub comments: u32,
    pub media_count: usize,
    pub time: Option<DateTime<Utc>>,
}

impl From<&FeedPost> for PostInfo {
    fn from(post: &FeedPost) -> Self {
        Self {
            id: post.id.to_string(),
            author: post.author_display().to_string(),
            category: post.author_category.clone(),
            title: post.title.clone(),
            excerpt: excerpt(&post.content),
            tier: post.tier_required.label().to_string(),
            locked: post.is_locked(),
            likes: post.likes_count,
            comments: post.comments_count,
            media_count: post.media.len(),
            time: post.created_at,
        }
    }
}

impl TableRow for PostInfo {
    fn headers() -> Vec<&'static str> {
        vec!["ID", "Author", "Title", "Tier", "Locked", "Likes", "Comments", "Time"]
    }
    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.author.clone(),
            self.title.clone(),
            self.tier.clone(),
            if self.locked { "🔒".to_string() } else { String::new() },
            self.likes.to_string(),
            self.comments.to_string(),
            format_relative_time(self.time),
        ]
    }
}

impl PlainPrint for PostInfo {
    fn plain_print(&self) {
        let lock_marker = if self.locked {
            "🔒 ".to_string()
        } else {
            String::new()
        };
        println!(
            "{}[{}] {} {}",
            lock_marker,
            self.id.cyan(),
            self.author.green(),
            format_relative_time(self.time).dimmed()
        );
        if !self.title.is_empty() {
            println!("   {}", self.title.bold());
        }
        if !self.excerpt.is_empty() {
            println!("   {}", self.excerpt);
        }
        let mut meta = format!("♥ {}  💬 {}", self.likes, self.comments);
        if self.media_count > 0 {
            meta.push_str(&format!("  [{} media]", self.media_count));
        }
        if self.tier != "Public" {
            meta.push_str(&format!("  {}", self.tier));
        }
        println!("   {}", meta.dimmed());
        println!();
    }
}

/// Feed browse result.
#[derive(Debug, Clone, Serialize)]
pub struct FeedResult {
    pub viewer_id: String,
    pub has_more: bool,
    pub posts: Vec<PostInfo>,
}

/// Load up to `pages` feed pages and collect the merged posts.
pub async fn browse_feed(client: &FanClient, pages: u32, limit: u32) -> Result<FeedResult> {
    let viewer_id = client.identity().resolve(IdentityContext::Feed).await?;

    let mut session = FeedSession::new(client, &viewer_id, limit);

    for _ in 0..pages {
        match session.load_next_page().await? {
            PageOutcome::EndOfFeed => break,
            PageOutcome::Appended(_) | PageOutcome::Skipped => {}
        }
        if !session.has_more() {
            break;
        }
    }

    Ok(FeedResult {
        viewer_id,
        has_more: session.has_more(),
        posts: session.posts().iter().map(PostInfo::from).collect(),
    })
}

fn excerpt(content: &str) -> String {
    let flattened = content.split_whitespace().collect::<Vec<_>>().join(" ");
    if flattened.chars().count() <= 80 {
        flattened
    } else {
        let cut: String = flattened.chars().take(77).collect();
        format!("{}...", cut)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt_truncates() {
        let short = excerpt("hello world");
        assert_eq!(short, "hello world");

        let long = excerpt(&"word ".repeat(40));
        assert!(long.ends_with("..."));
        assert!(long.chars().count() <= 80);
    }

    #[test]
    fn test_post_info_from_feed_post() {
        let post = FeedPost {
            id: "p-1".into(),
            content: "body text".into(),
            likes_count: 3,
            ..Default::default()
        };

        let info = PostInfo::from(&post);
        assert_eq!(info.id, "p-1");
        assert_eq!(info.author, "Unknown");
        assert_eq!(info.likes, 3);
        assert!(!info.locked);
    }
}
