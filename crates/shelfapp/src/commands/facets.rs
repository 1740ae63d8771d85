use crate::commands::CmdResult;
use crate::error::Result;
use crate::fields::facet_fields;
use crate::model::Record;
use crate::view::facet_options;

/// Options of one facet, or of every facet of `R` when `field` is `None`.
pub fn run<R: Record>(records: &[R], field: Option<&str>) -> Result<CmdResult> {
    let fields: Vec<&str> = match field {
        Some(f) => vec![f],
        None => facet_fields(R::FIELDS).collect(),
    };
    let mut result = CmdResult::default();
    for name in fields {
        let options = facet_options(records, name)?;
        result.facets.push((name.to_string(), options));
    }
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ShelfError;
    use crate::store::fixtures::{sample_ebooks, sample_fines};

    #[test]
    fn every_facet_when_unspecified() {
        let result = run(&sample_fines(), None).unwrap();
        let names: Vec<_> = result.facets.iter().map(|(n, _)| n.as_str()).collect();
        assert_eq!(names, vec!["status", "fine_type"]);
        assert_eq!(result.facets[1].1, vec!["All", "Late Return", "Lost Book", "Damage"]);
    }

    #[test]
    fn single_facet() {
        let result = run(&sample_ebooks(), Some("format")).unwrap();
        assert_eq!(result.facets.len(), 1);
        let (name, options) = &result.facets[0];
        assert_eq!(name, "format");
        assert_eq!(options, &vec!["All", "EPUB", "PDF"]);
    }

    #[test]
    fn non_facet_field_is_rejected() {
        let err = run(&sample_ebooks(), Some("title")).unwrap_err();
        assert!(matches!(err, ShelfError::UnknownFacet(_)));
    }
}
