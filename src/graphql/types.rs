//! GraphQL types for the catalog API

use async_graphql::dataloader::DataLoader;
use async_graphql::{
    ComplexObject, Context, ErrorExtensions, InputValueError, InputValueResult, Result, Scalar,
    ScalarType, SimpleObject, Value,
};
use catalog_macros::mutation_result;
use chrono::NaiveDate;

use crate::db::sqlite_helpers::DATE_FORMAT;
use crate::db::{AuthorRecord, BookRecord};
use crate::services::{AuthTokens, TokenPayload as TokenClaims};

use super::loaders::{AuthorLoader, BooksByAuthorLoader};

// ============================================================================
// Scalars
// ============================================================================

/// Calendar date serialized as `YYYY-MM-DD`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Date(pub NaiveDate);

impl From<NaiveDate> for Date {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

impl From<Date> for NaiveDate {
    fn from(date: Date) -> Self {
        date.0
    }
}

#[Scalar(name = "Date")]
impl ScalarType for Date {
    fn parse(value: Value) -> InputValueResult<Self> {
        match &value {
            Value::String(s) => NaiveDate::parse_from_str(s, DATE_FORMAT)
                .map(Date)
                .map_err(|_| {
                    InputValueError::custom(format!("Invalid date \"{}\", expected YYYY-MM-DD", s))
                }),
            _ => Err(InputValueError::expected_type(value)),
        }
    }

    fn to_value(&self) -> Value {
        Value::String(self.0.format(DATE_FORMAT).to_string())
    }
}

// ============================================================================
// Catalog
// ============================================================================

/// A person who wrote books
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub birth_date: Date,
}

impl From<AuthorRecord> for Author {
    fn from(r: AuthorRecord) -> Self {
        Self {
            id: r.id,
            name: r.name,
            birth_date: r.birth_date.into(),
        }
    }
}

#[ComplexObject]
impl Author {
    /// Books written by this author, in storage order
    async fn books(&self, ctx: &Context<'_>) -> Result<Vec<Book>> {
        let loader = ctx.data_unchecked::<DataLoader<BooksByAuthorLoader>>();
        let books = loader
            .load_one(self.id)
            .await
            .map_err(|e| e.extend())?
            .unwrap_or_default();

        Ok(books.into_iter().map(Book::from).collect())
    }
}

/// A book in the catalog
#[derive(Debug, Clone, SimpleObject)]
#[graphql(complex)]
pub struct Book {
    pub id: i64,
    pub title: String,
    /// ID of the referenced author
    pub author_id: i64,
    pub published_date: Date,
}

impl From<BookRecord> for Book {
    fn from(r: BookRecord) -> Self {
        Self {
            id: r.id,
            title: r.title,
            author_id: r.author_id,
            published_date: r.published_date.into(),
        }
    }
}

#[ComplexObject]
impl Book {
    /// The author this book references
    async fn author(&self, ctx: &Context<'_>) -> Result<Option<Author>> {
        let loader = ctx.data_unchecked::<DataLoader<AuthorLoader>>();
        let author = loader.load_one(self.author_id).await.map_err(|e| e.extend())?;
        Ok(author.map(Author::from))
    }
}

mutation_result!(CreateBookResult, book: Book);
mutation_result!(DeleteResult);

// ============================================================================
// Auth
// ============================================================================

/// Claims carried by a verified access token
#[derive(Debug, Clone, SimpleObject)]
pub struct TokenPayload {
    pub user_id: String,
    pub username: String,
    /// Expiry (unix seconds)
    pub exp: i64,
    /// Time of the login that started this token chain (unix seconds)
    pub orig_iat: i64,
}

impl From<TokenClaims> for TokenPayload {
    fn from(p: TokenClaims) -> Self {
        Self {
            user_id: p.user_id,
            username: p.username,
            exp: p.exp,
            orig_iat: p.orig_iat,
        }
    }
}

/// Result of `tokenAuth`
#[derive(Debug, Clone, SimpleObject)]
pub struct TokenAuthResult {
    /// Access token (JWT)
    pub token: String,
    pub refresh_token: String,
    /// Access token lifetime in seconds
    pub expires_in: i64,
    pub token_type: String,
    pub payload: TokenPayload,
}

impl From<AuthTokens> for TokenAuthResult {
    fn from(t: AuthTokens) -> Self {
        Self {
            token: t.access_token,
            refresh_token: t.refresh_token,
            expires_in: t.expires_in,
            token_type: t.token_type,
            payload: t.payload.into(),
        }
    }
}

/// Result of `refreshToken`. The refresh token passed in is no longer valid.
#[derive(Debug, Clone, SimpleObject)]
pub struct RefreshTokenResult {
    pub token: String,
    pub refresh_token: String,
    pub expires_in: i64,
    pub token_type: String,
    pub payload: TokenPayload,
}

impl From<AuthTokens> for RefreshTokenResult {
    fn from(t: AuthTokens) -> Self {
        Self {
            token: t.access_token,
            refresh_token: t.refresh_token,
            expires_in: t.expires_in,
            token_type: t.token_type,
            payload: t.payload.into(),
        }
    }
}

/// Result of `verifyToken`
#[derive(Debug, Clone, SimpleObject)]
pub struct VerifyTokenResult {
    pub valid: bool,
    pub payload: TokenPayload,
}
