//! Repository for the `blog_posts` table.

use sqlx::PgPool;

use folio_core::types::DbId;

use crate::models::blog_post::{BlogPost, CreateBlogPost, UpdateBlogPost};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, slug, excerpt, content_markdown, cover_image_url, \
    tags, seo_title, seo_description, published, published_at, \
    created_at, updated_at, deleted_at";

/// Helper to compute OFFSET safely from 1-based `page` and `per_page`.
fn page_offset(page: u32, per_page: u32) -> i64 {
    let page = page.saturating_sub(1);
    (page as i64) * (per_page as i64)
}

/// Provides CRUD and publishing operations for blog posts.
pub struct BlogPostRepo;

impl BlogPostRepo {
    // ── Standard CRUD ────────────────────────────────────────────────

    /// Insert a new blog post. When created with `published = true`,
    /// `published_at` is stamped at insert time.
    ///
    /// Fails with a unique violation if another active post already claims
    /// the slug, case-insensitively.
    pub async fn create(pool: &PgPool, input: &CreateBlogPost) -> Result<BlogPost, sqlx::Error> {
        let query = format!(
            "INSERT INTO blog_posts
                (title, slug, excerpt, content_markdown, cover_image_url, tags,
                 seo_title, seo_description, published, published_at)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9,
                     CASE WHEN $9 THEN NOW() END)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content_markdown)
            .bind(&input.cover_image_url)
            .bind(&input.tags)
            .bind(&input.seo_title)
            .bind(&input.seo_description)
            .bind(input.published)
            .fetch_one(pool)
            .await
    }

    /// Find a post by internal ID. Excludes soft-deleted rows.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<BlogPost>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM blog_posts WHERE id = $1 AND deleted_at IS NULL");
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find an active post by slug, case-insensitively.
    pub async fn find_by_slug(pool: &PgPool, slug: &str) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_posts \
             WHERE LOWER(slug) = LOWER($1) AND deleted_at IS NULL"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(slug)
            .fetch_optional(pool)
            .await
    }

    /// Whether an active post (other than `exclude_id`, when given) already
    /// claims this slug, case-insensitively.
    pub async fn slug_exists(
        pool: &PgPool,
        slug: &str,
        exclude_id: Option<DbId>,
    ) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as(
            "SELECT EXISTS(
                SELECT 1 FROM blog_posts
                WHERE LOWER(slug) = LOWER($1)
                  AND deleted_at IS NULL
                  AND ($2::uuid IS NULL OR id <> $2)
            )",
        )
        .bind(slug)
        .bind(exclude_id)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// List active posts, newest first, paginated with a 1-based `page`.
    /// `published_only` restricts to publicly visible posts.
    pub async fn list(
        pool: &PgPool,
        published_only: bool,
        page: u32,
        per_page: u32,
    ) -> Result<Vec<BlogPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_posts
             WHERE deleted_at IS NULL AND (NOT $1 OR published)
             ORDER BY created_at DESC
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(published_only)
            .bind(per_page as i64)
            .bind(page_offset(page, per_page))
            .fetch_all(pool)
            .await
    }

    /// Count active posts, optionally only published ones.
    pub async fn count(pool: &PgPool, published_only: bool) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM blog_posts \
             WHERE deleted_at IS NULL AND (NOT $1 OR published)",
        )
        .bind(published_only)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }

    /// The most recently published posts.
    pub async fn recent(pool: &PgPool, limit: i64) -> Result<Vec<BlogPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_posts
             WHERE published AND deleted_at IS NULL
             ORDER BY published_at DESC
             LIMIT $1"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(limit)
            .fetch_all(pool)
            .await
    }

    /// Active posts carrying the given tag (array containment, GIN-backed).
    pub async fn find_by_tag(pool: &PgPool, tag: &str) -> Result<Vec<BlogPost>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM blog_posts
             WHERE tags @> ARRAY[$1] AND deleted_at IS NULL
             ORDER BY created_at DESC"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(tag)
            .fetch_all(pool)
            .await
    }

    /// Update a post. Only non-`None` fields in `input` are applied;
    /// `updated_at` is refreshed by the database trigger.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateBlogPost,
    ) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "UPDATE blog_posts SET
                title = COALESCE($2, title),
                slug = COALESCE($3, slug),
                excerpt = COALESCE($4, excerpt),
                content_markdown = COALESCE($5, content_markdown),
                cover_image_url = COALESCE($6, cover_image_url),
                tags = COALESCE($7, tags),
                seo_title = COALESCE($8, seo_title),
                seo_description = COALESCE($9, seo_description),
                published = COALESCE($10, published)
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.slug)
            .bind(&input.excerpt)
            .bind(&input.content_markdown)
            .bind(&input.cover_image_url)
            .bind(&input.tags)
            .bind(&input.seo_title)
            .bind(&input.seo_description)
            .bind(input.published)
            .fetch_optional(pool)
            .await
    }

    /// Publish a post, stamping `published_at` the first time only.
    ///
    /// Returns `None` if no active row with the given `id` exists.
    pub async fn publish(pool: &PgPool, id: DbId) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "UPDATE blog_posts SET
                published = TRUE,
                published_at = COALESCE(published_at, NOW())
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Take a post out of public view without deleting it.
    pub async fn unpublish(pool: &PgPool, id: DbId) -> Result<Option<BlogPost>, sqlx::Error> {
        let query = format!(
            "UPDATE blog_posts SET published = FALSE
             WHERE id = $1 AND deleted_at IS NULL
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BlogPost>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    // ── Soft delete / restore ────────────────────────────────────────

    /// Soft-delete a post. Returns `true` if a row was marked deleted.
    pub async fn soft_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE blog_posts SET deleted_at = NOW() \
             WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Restore a soft-deleted post. Returns `true` if a row was restored.
    ///
    /// Fails with a unique violation if the slug has since been claimed by a
    /// newer active post.
    pub async fn restore(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE blog_posts SET deleted_at = NULL \
             WHERE id = $1 AND deleted_at IS NOT NULL",
        )
        .bind(id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Permanently delete a post by ID.
    pub async fn hard_delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM blog_posts WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
