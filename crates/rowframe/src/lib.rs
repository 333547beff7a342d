//! Read the result of a query into a [`Frame`].
//!
//! ```no_run
//! # async fn example(db: rowframe::Db, book: rowframe::schema::ModelId) -> rowframe::Result<()> {
//! use rowframe::stmt::Query;
//!
//! let frame = rowframe::read_frame(&db, Query::all(book))
//!     .fields(["id", "title", "author__name"])
//!     .index_col("id")
//!     .exec()
//!     .await?;
//!
//! println!("read {} books", frame.len());
//! # Ok(())
//! # }
//! ```

mod chunks;
pub use chunks::Chunks;

mod db;
pub use db::Db;

pub mod frame;
pub use frame::{Column, Frame};

mod options;
pub use options::ReadOptions;

mod read;
pub use read::{read_frame, ReadFrame};

mod verbose;

pub use rowframe_core::{bail, driver, err, schema, stmt, Error, Result, Schema};
