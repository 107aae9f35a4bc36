#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;

pub mod query;

pub use error::{Error, Result};
pub use query::{Document, KnnQuery, MatchAllQuery, Query, RawStringQuery, TermQuery};
