//! Query specifications
//!
//! Listings are described by plain values (`PostQuery`, `TagQuery`) that the
//! repositories compile into SQL. A specification names the filter, the
//! order, the limit and the relations to batch-fetch; it never touches the
//! database itself.
//!
//! The compiled statements use `?` placeholders, which both SQLite and MySQL
//! accept, so one statement text serves either backend.
//!
//! Per-post counts are computed with correlated subqueries in the select
//! list. Joining `comments` and `likes` directly would multiply rows and
//! inflate both counts.

use sqlx::mysql::{MySql, MySqlArguments};
use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments};

/// Which posts a listing selects
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostFilter {
    /// Every post
    All,
    /// The post with this exact slug
    Slug(String),
    /// Posts carrying the tag with this id
    TagId(i64),
}

/// Order of a post listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    /// Most liked first, ties by ascending id
    LikesDesc,
    /// Newest first, ties by descending id
    PublishedAtDesc,
}

/// Relation fetched for the whole result set in one extra statement
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// Tags of each post, with every tag's post count
    Tags,
    /// Comments of each post, with their authors
    Comments,
}

/// Specification of a post listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub filter: PostFilter,
    pub order: PostOrder,
    pub limit: Option<u32>,
    pub relations: Vec<Relation>,
}

impl PostQuery {
    /// Most liked posts, with tags
    pub fn top_by_likes(limit: u32) -> Self {
        Self {
            filter: PostFilter::All,
            order: PostOrder::LikesDesc,
            limit: Some(limit),
            relations: vec![Relation::Tags],
        }
    }

    /// Newest posts, with tags
    pub fn most_recent(limit: u32) -> Self {
        Self {
            filter: PostFilter::All,
            order: PostOrder::PublishedAtDesc,
            limit: Some(limit),
            relations: vec![Relation::Tags],
        }
    }

    /// The post with this slug, with tags and comments
    pub fn by_slug(slug: impl Into<String>) -> Self {
        Self {
            filter: PostFilter::Slug(slug.into()),
            order: PostOrder::PublishedAtDesc,
            limit: Some(1),
            relations: vec![Relation::Tags, Relation::Comments],
        }
    }

    /// Newest posts carrying a tag, with tags
    pub fn for_tag(tag_id: i64, limit: u32) -> Self {
        Self {
            filter: PostFilter::TagId(tag_id),
            order: PostOrder::PublishedAtDesc,
            limit: Some(limit),
            relations: vec![Relation::Tags],
        }
    }

    /// Whether the relation is batch-fetched for this listing
    pub fn includes(&self, relation: Relation) -> bool {
        self.relations.contains(&relation)
    }

    /// Compile the main listing statement
    pub fn to_sql(&self) -> SqlStatement {
        let mut sql = String::from(
            "SELECT p.id, p.title, p.text, p.slug, p.image, p.published_at, \
             p.author_id, u.username AS author_username, \
             (SELECT COUNT(*) FROM comments c WHERE c.post_id = p.id) AS comments_count, \
             (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS likes_count \
             FROM posts p \
             INNER JOIN users u ON u.id = p.author_id",
        );
        let mut params = Vec::new();

        match &self.filter {
            PostFilter::All => {}
            PostFilter::Slug(slug) => {
                sql.push_str(" WHERE p.slug = ?");
                params.push(SqlParam::Text(slug.clone()));
            }
            PostFilter::TagId(tag_id) => {
                sql.push_str(
                    " WHERE EXISTS (SELECT 1 FROM post_tags pt \
                     WHERE pt.post_id = p.id AND pt.tag_id = ?)",
                );
                params.push(SqlParam::Int(*tag_id));
            }
        }

        sql.push_str(match self.order {
            PostOrder::LikesDesc => " ORDER BY likes_count DESC, p.id ASC",
            PostOrder::PublishedAtDesc => " ORDER BY p.published_at DESC, p.id DESC",
        });

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(SqlParam::Int(i64::from(limit)));
        }

        SqlStatement { sql, params }
    }
}

/// Order of a tag listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOrder {
    /// Most used first, ties by title
    PostCountDesc,
}

/// Specification of a tag listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagQuery {
    pub order: TagOrder,
    pub limit: Option<u32>,
}

impl TagQuery {
    /// Most used tags
    pub fn popular(limit: u32) -> Self {
        Self {
            order: TagOrder::PostCountDesc,
            limit: Some(limit),
        }
    }

    /// Compile the listing statement
    pub fn to_sql(&self) -> SqlStatement {
        let mut sql = String::from(
            "SELECT t.id, t.title, COUNT(pt.post_id) AS posts_count \
             FROM tags t \
             LEFT JOIN post_tags pt ON pt.tag_id = t.id \
             GROUP BY t.id, t.title",
        );
        let mut params = Vec::new();

        sql.push_str(match self.order {
            TagOrder::PostCountDesc => " ORDER BY posts_count DESC, t.title ASC",
        });

        if let Some(limit) = self.limit {
            sql.push_str(" LIMIT ?");
            params.push(SqlParam::Int(i64::from(limit)));
        }

        SqlStatement { sql, params }
    }
}

/// Statement fetching the tags of many posts at once
pub fn tags_for_posts_sql(post_ids: &[i64]) -> SqlStatement {
    let sql = format!(
        "SELECT pt.post_id, t.id, t.title, \
         (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count \
         FROM post_tags pt \
         INNER JOIN tags t ON t.id = pt.tag_id \
         WHERE pt.post_id IN ({}) \
         ORDER BY t.title ASC, t.id ASC",
        placeholders(post_ids.len())
    );

    SqlStatement {
        sql,
        params: post_ids.iter().copied().map(SqlParam::Int).collect(),
    }
}

/// Statement fetching the comments of many posts at once
pub fn comments_for_posts_sql(post_ids: &[i64]) -> SqlStatement {
    let sql = format!(
        "SELECT c.id, c.post_id, c.text, c.published_at, \
         c.author_id, u.username AS author_username \
         FROM comments c \
         INNER JOIN users u ON u.id = c.author_id \
         WHERE c.post_id IN ({}) \
         ORDER BY c.published_at ASC, c.id ASC",
        placeholders(post_ids.len())
    );

    SqlStatement {
        sql,
        params: post_ids.iter().copied().map(SqlParam::Int).collect(),
    }
}

/// Statement looking a tag up by its exact title, with its post count
pub fn tag_by_title_sql(title: &str) -> SqlStatement {
    SqlStatement {
        sql: "SELECT t.id, t.title, \
              (SELECT COUNT(*) FROM post_tags x WHERE x.tag_id = t.id) AS posts_count \
              FROM tags t WHERE t.title = ?"
            .to_string(),
        params: vec![SqlParam::Text(title.to_string())],
    }
}

fn placeholders(count: usize) -> String {
    vec!["?"; count].join(", ")
}

/// Value bound to a `?` placeholder
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SqlParam {
    Int(i64),
    Text(String),
}

/// SQL text and its parameters, in placeholder order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SqlStatement {
    pub sql: String,
    pub params: Vec<SqlParam>,
}

impl SqlStatement {
    /// Prepare the statement for a SQLite pool
    pub fn sqlite_query(&self) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        self.params
            .iter()
            .fold(sqlx::query::<Sqlite>(&self.sql), |query, param| match param {
                SqlParam::Int(value) => query.bind(*value),
                SqlParam::Text(value) => query.bind(value.as_str()),
            })
    }

    /// Prepare the statement for a MySQL pool
    pub fn mysql_query(&self) -> Query<'_, MySql, MySqlArguments> {
        self.params
            .iter()
            .fold(sqlx::query::<MySql>(&self.sql), |query, param| match param {
                SqlParam::Int(value) => query.bind(*value),
                SqlParam::Text(value) => query.bind(value.as_str()),
            })
    }
}
