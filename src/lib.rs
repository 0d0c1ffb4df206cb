//! # DynamoDB Query Composition
//!
//! Client-side building blocks for reading DynamoDB tables:
//! - Filter expressions with `AND`/`OR`/`NOT` composition
//! - Sort-key conditions for queries
//! - Collision-free `#name` / `:value` placeholder allocation
//! - A paginated result iterator that fetches continuation pages on demand
//! - A storage façade for single-table designs with two global secondary indexes:
//!   entity saves, conditional removes, updates and chunked batch writes
//!
//! ## Features
//!
//! - **Never fails while composing**: operands that cannot be encoded degrade to strings
//! - **Async-first**: Built on `tokio` and `aws-sdk-dynamodb`
//! - **Pluggable transport**: pages come from any [`PageFetcher`], not just the SDK client
//! - **Streaming**: Turn an iterator into an async stream of decoded items
//! - **Reserved words**: key attributes that collide with a reserved word are escaped automatically
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use dynamo_query::{Error, Filter, SortKeyCondition, Storage};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Deserialize)]
//! struct Order {
//!     status: String,
//!     total: u64,
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Error> {
//!     // Initialize the global DynamoDB client
//!     let config = aws_config::defaults(aws_config::BehaviorVersion::latest()).load().await;
//!     dynamo_query::init(&config).await;
//!
//!     let storage = Storage::with_global_client("shop").await;
//!
//!     // Orders of one customer that are open or large
//!     let orders = storage
//!         .query(
//!             "CUSTOMER#42",
//!             Some(SortKeyCondition::begins_with("ORDER#")),
//!             &[Filter::or([
//!                 Filter::eq("status", "open"),
//!                 Filter::gte("total", 1000),
//!             ])],
//!         )
//!         .await?;
//!
//!     while orders.next().await {
//!         let order: Order = orders.decode().await?;
//!         println!("{order:?}");
//!     }
//!     if let Some(e) = orders.error().await {
//!         eprintln!("pagination stopped: {e}");
//!     }
//!
//!     Ok(())
//! }
//! ```
#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    unused_allocation,
    unused_comparisons,
    unused_parens,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unreachable_pub,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results,
    unreachable_code,
    unused_mut
)]

mod error;
pub use error::{ClientError, Error};

/// Filter and key-condition expressions
pub mod expression;

/// Single-item requests, updates and batch writes
pub mod item;

/// Requests, pages and the result iterator
pub mod query;

/// Storage façade for single-table designs
pub mod storage;

// Re-export main types for convenience
pub use expression::{ExpressionScope, Filter, Joiner, Operator, Registry, SortKeyCondition, Value};
pub use query::{
    field_value, Decoder, FindCondition, Item, IteratorState, Operation, Output, PageFetcher,
    QueryIterator, Request, SerdeDecoder,
};
pub use item::{BatchWrite, ItemClient, ItemOperation, ItemRequest, Update};
pub use storage::{
    Entity, GetOptions, Index, QueryOptions, ScanOptions, Storage, StorageOptions, UpdateOptions,
    BATCH_WRITE_SIZE,
};

// Return values of an update
pub use aws_sdk_dynamodb::types::ReturnValue;

// Re-export aws-config types for configuration
pub use aws_config::{
    defaults,
    meta::region::{ProvideRegion, RegionProviderChain},
    retry::{RetryConfig, RetryMode},
    timeout::TimeoutConfig,
    BehaviorVersion, Region, SdkConfig,
};

// Re-export aws-types for advanced configuration
pub use aws_types::sdk_config::Builder as SdkConfigBuilder;

use aws_sdk_dynamodb::Client as DynamoDbClient;
use tokio::sync::OnceCell;

/// Global DynamoDB client instance
static GLOBAL_CLIENT: OnceCell<DynamoDbClient> = OnceCell::const_new();

/// Initialize the global DynamoDB client with default sensible settings
///
/// This is called automatically by `dynamodb_client()` if not already initialized.
/// It configures:
/// - Adaptive retry mode with 3 max attempts
/// - Exponential backoff starting at 1 second
/// - Connect timeout: 3 seconds
/// - Read timeout: 20 seconds
/// - Operation timeout: 60 seconds
/// - LocalStack support via AWS_PROFILE=localstack
///
/// Note: This function is internal. Use `init()` or `init_with_client()` for
/// custom configuration, or let `dynamodb_client()` auto-initialize with defaults.
async fn aws_config_defaults() -> SdkConfig {
    use aws_config::BehaviorVersion;
    use aws_types::sdk_config::{RetryConfig, TimeoutConfig};
    use std::time::Duration;

    let timeout_config = TimeoutConfig::builder()
        .connect_timeout(Duration::from_secs(3))
        .read_timeout(Duration::from_secs(20))
        .operation_timeout(Duration::from_secs(60))
        .build();

    let mut loader = defaults(BehaviorVersion::latest())
        .retry_config(
            RetryConfig::adaptive()
                .with_max_attempts(3)
                .with_initial_backoff(Duration::from_secs(1)),
        )
        .timeout_config(timeout_config);

    // Support LocalStack via AWS_PROFILE=localstack
    if std::env::var("AWS_PROFILE").unwrap_or_default() == "localstack" {
        loader = loader.endpoint_url("http://127.0.0.1:4566");
    }

    loader.load().await
}

/// Initialize the global DynamoDB client with a custom AWS config
///
/// Use this when you need custom AWS configuration beyond the defaults.
///
/// # Example
///
/// ```rust,no_run
/// #[tokio::main]
/// async fn main() {
///     let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
///         .region(aws_config::Region::new("us-west-2"))
///         .load()
///         .await;
///     dynamo_query::init(&config).await;
///
///     // Storages built on the global client now use this configuration
///     let orders = dynamo_query::Storage::with_global_client("orders").await;
/// }
/// ```
pub async fn init(config: &SdkConfig) {
    let _ = GLOBAL_CLIENT
        .get_or_init(|| async { DynamoDbClient::new(config) })
        .await;
}

/// Initialize the global DynamoDB client with a custom client instance
///
/// Useful for testing or when you need fine-grained control over client configuration.
///
/// # Example
///
/// ```rust,no_run
/// use aws_sdk_dynamodb::Client;
///
/// #[tokio::main]
/// async fn main() {
///     let config = aws_config::load_from_env().await;
///     let client = Client::new(&config);
///     dynamo_query::init_with_client(client).await;
/// }
/// ```
pub async fn init_with_client(client: DynamoDbClient) {
    let _ = GLOBAL_CLIENT.get_or_init(|| async { client }).await;
}

/// Get a reference to the global DynamoDB client
///
/// Automatically initializes the client with sensible defaults if not already initialized.
/// For custom configuration, call [`init`] or [`init_with_client`] before using this function.
///
/// # Auto-Initialization
///
/// If not explicitly initialized, this function will automatically configure:
/// - Adaptive retry mode with 3 max attempts
/// - Exponential backoff starting at 1 second
/// - Connect timeout: 3 seconds
/// - Read timeout: 20 seconds
/// - Operation timeout: 60 seconds
/// - LocalStack support via AWS_PROFILE=localstack
///
/// # Example
///
/// ```rust,no_run
/// use dynamo_query::{Output, QueryIterator, Request, SerdeDecoder};
///
/// # async fn example() {
/// // Client auto-initializes with defaults on first use
/// let client = dynamo_query::dynamodb_client().await;
/// let request = Request::scan("orders").limit(100);
/// let iterator = QueryIterator::new(client, request, Output::default(), SerdeDecoder);
/// # }
/// ```
///
/// # Custom Configuration Example
///
/// ```rust,no_run
/// # async fn example() {
/// // Initialize with custom config before first use
/// let config = dynamo_query::defaults(dynamo_query::BehaviorVersion::latest())
///     .region(dynamo_query::Region::new("us-west-2"))
///     .load()
///     .await;
/// dynamo_query::init(&config).await;
///
/// // Now uses custom configuration
/// let client = dynamo_query::dynamodb_client().await;
/// # }
/// ```
pub async fn dynamodb_client() -> &'static DynamoDbClient {
    GLOBAL_CLIENT
        .get_or_init(|| async {
            let config = aws_config_defaults().await;
            tracing::debug!(region = ?config.region(), "initialized default DynamoDB client");
            DynamoDbClient::new(&config)
        })
        .await
}

/// Whether `name` collides with a DynamoDB reserved word.
///
/// Reserved words are matched case-insensitively. Attribute names that
/// collide must be written through a `#name` placeholder.
pub(crate) fn is_reserved_word(name: &str) -> bool {
    // https://docs.aws.amazon.com/amazondynamodb/latest/developerguide/ReservedWords.html
    #[rustfmt::skip]
    const KEYS: [&str; 573] = [
"abort", "absolute", "action", "add", "after", "agent", "aggregate", "all", "allocate", "alter", "analyze", "and", "any", "archive", "are", "array", "as", "asc", "ascii", "asensitive", "assertion", "asymmetric", "at", "atomic", "attach", "attribute", "auth", "authorization", "authorize", "auto", "avg", "back", "backup", "base", "batch", "before", "begin", "between", "bigint", "binary", "bit", "blob", "block", "boolean", "both", "breadth", "bucket", "bulk", "by", "byte", "call", "called", "calling", "capacity", "cascade", "cascaded", "case", "cast", "catalog", "char", "character", "check", "class", "clob", "close", "cluster", "clustered", "clustering", "clusters", "coalesce", "collate", "collation", "collection", "column", "columns", "combine", "comment", "commit", "compact", "compile", "compress", "condition", "conflict", "connect", "connection", "consistency", "consistent", "constraint", "constraints", "constructor", "consumed", "continue", "convert", "copy", "corresponding", "count", "counter", "create", "cross", "cube", "current", "cursor", "cycle", "data", "database", "date", "datetime", "day", "deallocate", "dec", "decimal", "declare", "default", "deferrable", "deferred", "define", "defined", "definition", "delete", "delimited", "depth", "deref", "desc", "describe", "descriptor", "detach", "deterministic", "diagnostics", "directories", "disable", "disconnect", "distinct", "distribute", "do", "domain", "double", "drop", "dump", "duration", "dynamic", "each", "element", "else", "elseif", "empty", "enable", "end", "equal", "equals", "error", "escape", "escaped", "eval", "evaluate", "exceeded", "except", "exception", "exceptions", "exclusive", "exec", "execute", "exists", "exit", "explain", "explode", "export", "expression", "extended", "external", "extract", "fail", "false", "family", "fetch", "fields", "file", "filter", "filtering", "final", "finish", "first", "fixed", "flattern", "float", "for", "force", "foreign", "format", "forward", "found", "free", "from", "full", "function", "functions", "general", "generate", "get", "glob", "global", "go", "goto", "grant", "greater", "group", "grouping", "handler", "hash", "have", "having", "heap", "hidden", "hold", "hour", "identified", "identity", "if", "ignore", "immediate", "import", "in", "including", "inclusive", "increment", "incremental", "index", "indexed", "indexes", "indicator", "infinite", "initially", "inline", "inner", "innter", "inout", "input", "insensitive", "insert", "instead", "int", "integer", "intersect", "interval", "into", "invalidate", "is", "isolation", "item", "items", "iterate", "join", "key", "keys", "lag", "language", "large", "last", "lateral", "lead", "leading", "leave", "left", "length", "less", "level", "like", "limit", "limited", "lines", "list", "load", "local", "localtime", "localtimestamp", "location", "locator", "lock", "locks", "log", "loged", "long", "loop", "lower", "map", "match", "materialized", "max", "maxlen", "member", "merge", "method", "metrics", "min", "minus", "minute", "missing", "mod", "mode", "modifies", "modify", "module", "month", "multi", "multiset", "name", "names", "national", "natural", "nchar", "nclob", "new", "next", "no", "none", "not", "null", "nullif", "number", "numeric", "object", "of", "offline", "offset", "old", "on", "online", "only", "opaque", "open", "operator", "option", "or", "order", "ordinality", "other", "others", "out", "outer", "output", "over", "overlaps", "override", "owner", "pad", "parallel", "parameter", "parameters", "partial", "partition", "partitioned", "partitions", "path", "percent", "percentile", "permission", "permissions", "pipe", "pipelined", "plan", "pool", "position", "precision", "prepare", "preserve", "primary", "prior", "private", "privileges", "procedure", "processed", "project", "projection", "property", "provisioning", "public", "put", "query", "quit", "quorum", "raise", "random", "range", "rank", "raw", "read", "reads", "real", "rebuild", "record", "recursive", "reduce", "ref", "reference", "references", "referencing", "regexp", "region", "reindex", "relative", "release", "remainder", "rename", "repeat", "replace", "request", "reset", "resignal", "resource", "response", "restore", "restrict", "result", "return", "returning", "returns", "reverse", "revoke", "right", "role", "roles", "rollback", "rollup", "routine", "row", "rows", "rule", "rules", "sample", "satisfies", "save", "savepoint", "scan", "schema", "scope", "scroll", "search", "second", "section", "segment", "segments", "select", "self", "semi", "sensitive", "separate", "sequence", "serializable", "session", "set", "sets", "shard", "share", "shared", "short", "show", "signal", "similar", "size", "skewed", "smallint", "snapshot", "some", "source", "space", "spaces", "sparse", "specific", "specifictype", "split", "sql", "sqlcode", "sqlerror", "sqlexception", "sqlstate", "sqlwarning", "start", "state", "static", "status", "storage", "store", "stored", "stream", "string", "struct", "style", "sub", "submultiset", "subpartition", "substring", "subtype", "sum", "super", "symmetric", "synonym", "system", "table", "tablesample", "temp", "temporary", "terminated", "text", "than", "then", "throughput", "time", "timestamp", "timezone", "tinyint", "to", "token", "total", "touch", "trailing", "transaction", "transform", "translate", "translation", "treat", "trigger", "trim", "true", "truncate", "ttl", "tuple", "type", "under", "undo", "union", "unique", "unit", "unknown", "unlogged", "unnest", "unprocessed", "unsigned", "until", "update", "upper", "url", "usage", "use", "user", "users", "using", "uuid", "vacuum", "value", "valued", "values", "varchar", "variable", "variance", "varint", "varying", "view", "views", "virtual", "void", "wait", "when", "whenever", "where", "while", "window", "with", "within", "without", "work", "wrapped", "write", "year", "zone"
];

    let name = name.to_ascii_lowercase();
    KEYS.contains(&name.as_str())
}
