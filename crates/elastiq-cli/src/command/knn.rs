//! The `knn` subcommand.

use elastiq_query::{Document, KnnQuery, Query, TermQuery};

use crate::TRACING_TARGET_COMMAND;
use crate::config::KnnArgs;

/// Builds the kNN query document described by `args`.
pub fn build(args: &KnnArgs) -> elastiq_query::Result<Document> {
    let filters = args
        .terms
        .iter()
        .map(|(field, value)| Box::new(TermQuery::new(field, value.as_str())) as Box<dyn Query>);

    let query = KnnQuery::new(&args.field, args.k, args.num_candidates, args.vector.clone())
        .with_boost(args.boost)
        .with_filters(filters);

    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        field = %query.field(),
        k = query.k(),
        dims = query.query_vector().len(),
        filters = query.filter_count(),
        "Building kNN query"
    );

    query.source()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn args() -> KnnArgs {
        KnnArgs {
            field: "embedding".to_owned(),
            k: 2,
            num_candidates: 20,
            vector: vec![0.25, -1.0],
            boost: None,
            terms: Vec::new(),
        }
    }

    #[test]
    fn test_build_without_filters() {
        let document = build(&args()).unwrap();
        assert_eq!(
            document,
            json!({"knn": {
                "field": "embedding",
                "k": 2,
                "num_candidates": 20,
                "query_vector": [0.25, -1.0]
            }})
        );
    }

    #[test]
    fn test_build_with_boost_and_terms() {
        let mut args = args();
        args.boost = Some(2.0);
        args.terms = vec![
            ("genre".to_owned(), "fantasy".to_owned()),
            ("lang".to_owned(), "en".to_owned()),
        ];

        let document = build(&args).unwrap();
        assert_eq!(document["knn"]["boost"], json!(2.0));
        assert_eq!(
            document["knn"]["filter"],
            json!([{"term": {"genre": "fantasy"}}, {"term": {"lang": "en"}}])
        );
    }
}
