//! List filters forwarded as query parameters.

/// Filters accepted by the list endpoints. Only the filters that are set
/// reach the server; `limit` is always sent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListFilters {
    pub search: Option<String>,
    pub org: Option<String>,
    pub user: Option<String>,
    pub project: Option<String>,
    pub stage: Option<String>,
    pub status: Option<String>,
    pub tier: Option<String>,
    pub open: Option<bool>,
    pub notebook: Option<bool>,
    pub limit: u32,
}

impl ListFilters {
    pub const DEFAULT_LIMIT: u32 = 100;

    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            ..Self::default()
        }
    }

    /// Query pairs in a stable order.
    pub fn to_query(&self) -> Vec<(&'static str, String)> {
        let text = [
            ("search", &self.search),
            ("org", &self.org),
            ("user", &self.user),
            ("project", &self.project),
            ("stage", &self.stage),
            ("status", &self.status),
            ("tier", &self.tier),
        ];
        let flags = [("open", self.open), ("notebook", self.notebook)];

        let mut query: Vec<(&'static str, String)> = text
            .into_iter()
            .filter_map(|(k, v)| v.as_ref().map(|v| (k, v.clone())))
            .collect();
        query.extend(
            flags
                .into_iter()
                .filter_map(|(k, v)| v.map(|v| (k, v.to_string()))),
        );
        query.push(("limit", self.limit.to_string()));
        query
    }
}
