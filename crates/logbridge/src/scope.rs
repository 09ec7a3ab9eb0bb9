use glob::Pattern;
use logbridge_convert::LogSink;
use logbridge_core::Result;
use logbridge_core::model::{AttributeList, OutputRecord};

/// Forwards only records whose scope name matches a glob. Records without a
/// scope are matched as the empty string.
pub struct ScopeFilter<S> {
    inner: S,
    pattern: Option<Pattern>,
    skipped: usize,
}

impl<S: LogSink> ScopeFilter<S> {
    pub fn new(inner: S, pattern: Option<Pattern>) -> Self {
        Self {
            inner,
            pattern,
            skipped: 0,
        }
    }

    pub fn skipped(&self) -> usize {
        self.skipped
    }

    pub fn into_inner(self) -> S {
        self.inner
    }
}

impl<S: LogSink> LogSink for ScopeFilter<S> {
    fn emit(
        &mut self,
        record: OutputRecord,
        attributes: AttributeList,
        scope_name: Option<String>,
    ) -> Result<()> {
        if let Some(pattern) = &self.pattern {
            if !pattern.matches(scope_name.as_deref().unwrap_or_default()) {
                self.skipped += 1;
                return Ok(());
            }
        }
        self.inner.emit(record, attributes, scope_name)
    }
}

#[cfg(test)]
mod tests {
    use logbridge_convert::{Bridge, ConvertedRecord};
    use logbridge_core::IncludedData;
    use testkit::{event_with_context, sample_event};

    use super::*;

    fn emit(filter: &mut ScopeFilter<Vec<ConvertedRecord>>, scope: Option<&str>) {
        filter
            .emit(
                OutputRecord::default(),
                AttributeList::new(),
                scope.map(str::to_string),
            )
            .unwrap();
    }

    #[test]
    fn glob_selects_scopes() {
        let mut filter = ScopeFilter::new(Vec::new(), Some(Pattern::new("App.*").unwrap()));
        emit(&mut filter, Some("App.Orders"));
        emit(&mut filter, Some("Lib.Http"));
        emit(&mut filter, None);

        assert_eq!(filter.skipped(), 2);
        let kept = filter.into_inner();
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].2.as_deref(), Some("App.Orders"));
    }

    #[test]
    fn no_pattern_keeps_everything() {
        let mut filter = ScopeFilter::new(Vec::new(), None);
        emit(&mut filter, None);
        emit(&mut filter, Some("x"));
        assert_eq!(filter.skipped(), 0);
        assert_eq!(filter.into_inner().len(), 2);
    }

    #[test]
    fn filters_bridged_events_by_source_context() {
        let pattern = Pattern::new("App.*").unwrap();
        let filter = ScopeFilter::new(Vec::<ConvertedRecord>::new(), Some(pattern));
        let mut bridge = Bridge::new(filter, IncludedData::DEFAULT);
        for context in ["App.Orders", "Lib.Http", "App.Billing"] {
            assert!(bridge.emit(&event_with_context(context)).unwrap());
        }
        assert!(bridge.emit(&sample_event()).unwrap());

        let filter = bridge.into_sink();
        assert_eq!(filter.skipped(), 2);
        let scopes: Vec<_> = filter
            .into_inner()
            .into_iter()
            .map(|(_, _, scope)| scope)
            .collect();
        assert_eq!(
            scopes,
            vec![Some("App.Orders".to_string()), Some("App.Billing".to_string())]
        );
    }
}
