//! Game operations wired to their stores.
//!
//! `GameService` is what a transport layer talks to. It owns the configured
//! matcher, scorer and paginator and enforces the checks that sit in front of
//! persistence (target exists, image exists, text length).

use std::sync::Arc;

use rand::Rng;
use rand::rngs::StdRng;

use crate::config::GameConfig;
use crate::identifiers::*;
use crate::models::{traits::*, types::*};
use crate::pagination::{Page, Paginator};
use crate::scoring::PostScorer;
use crate::target::{Resolution, TargetGenerator, TargetMatcher};

/// A post as submitted by a player, before scoring.
#[derive(Clone, Debug, PartialEq)]
pub struct PostSubmission {
    pub target_id: TargetIdentifier,
    pub text: String,
    /// Where the player was when they submitted
    pub submitted_from: Coordinate,
    pub image_id: Option<ImageIdentifier>,
}

/// A post together with the URL of its picture, if it has one.
#[derive(Clone, Debug, PartialEq)]
pub struct PostView {
    pub post: Post,
    pub picture_url: Option<String>,
}

pub struct GameService<R = StdRng> {
    config: GameConfig,
    matcher: TargetMatcher<R>,
    scorer: PostScorer,
    paginator: Paginator,
    targets: Arc<dyn TargetStore>,
    posts: Arc<dyn PostStore>,
    images: Arc<dyn ImageStore>,
}

impl<R: Rng + Send> GameService<R> {
    pub fn new(
        config: GameConfig,
        rng: R,
        targets: Arc<dyn TargetStore>,
        posts: Arc<dyn PostStore>,
        images: Arc<dyn ImageStore>,
    ) -> Result<Self> {
        config.validate()?;

        let generator = TargetGenerator::new(config.generation_range()?, rng);
        let matcher = TargetMatcher::new(config.acceptance_threshold_meters, generator);
        let paginator = Paginator::new(config.default_page_size)?;

        Ok(Self {
            config,
            matcher,
            scorer: PostScorer,
            paginator,
            targets,
            posts,
            images,
        })
    }

    /// Build a service on one store that handles targets, posts and images.
    pub fn with_store<S>(config: GameConfig, rng: R, store: Arc<S>) -> Result<Self>
    where
        S: TargetStore + PostStore + ImageStore + 'static,
    {
        Self::new(config, rng, store.clone(), store.clone(), store)
    }

    /// Reuse one of today's targets near `source`, or generate a new one.
    pub fn find_target_near(&self, source: Coordinate) -> Result<Resolution> {
        let candidates = self.targets.query_created_today()?;
        self.matcher.resolve(source, &candidates, self.targets.as_ref())
    }

    pub fn target(&self, id: &TargetIdentifier) -> Result<TargetLocation> {
        self.targets
            .get_by_id(id)?
            .ok_or(GameError::TargetNotFound(*id))
    }

    pub fn create_post(&self, submission: PostSubmission) -> Result<Post> {
        let text_chars = submission.text.chars().count();
        if text_chars > self.config.max_post_text_chars {
            return Err(GameError::InvalidPost(format!(
                "text is {} characters, limit is {}",
                text_chars, self.config.max_post_text_chars
            )));
        }

        let target = self.target(&submission.target_id)?;

        if let Some(image_id) = submission.image_id {
            if self.images.get(&image_id)?.is_none() {
                return Err(GameError::ImageNotFound(image_id));
            }
        }

        let final_distance = self.scorer.score(submission.submitted_from, &target);
        let post = self.posts.save(NewPost {
            target_id: target.id,
            text: submission.text,
            final_distance,
            image_id: submission.image_id,
        })?;

        tracing::info!(
            post_id = %post.id,
            target_id = %post.target_id,
            final_distance_m = post.final_distance,
            "created post"
        );

        Ok(post)
    }

    /// One page of a target's posts, oldest first. `None` means page 1.
    pub fn posts_page(
        &self,
        target_id: &TargetIdentifier,
        page_number: Option<usize>,
    ) -> Result<Page<PostView>> {
        let target = self.target(target_id)?;
        let posts = self.posts.query_by_target(&target.id)?;
        let page = self.paginator.page(posts, page_number.unwrap_or(1))?;

        let mut items = Vec::with_capacity(page.items.len());
        for post in page.items {
            items.push(self.view(post)?);
        }

        Ok(Page {
            items,
            page_number: page.page_number,
            is_last_page: page.is_last_page,
        })
    }

    /// Attach the picture URL, if the post has a picture and the host gave it one.
    pub fn view(&self, post: Post) -> Result<PostView> {
        let picture_url = match post.image_id {
            Some(image_id) => self.images.get(&image_id)?.and_then(|image| image.url),
            None => None,
        };

        Ok(PostView { post, picture_url })
    }

    pub fn upload_image(&self, payload: Vec<u8>) -> Result<ImageIdentifier> {
        self.images.upload(payload)
    }
}
