use std::collections::BTreeMap;

use crate::process::SalesRecord;

/// Sum of totals per product, largest first. Ties keep name order.
pub fn product_totals(records: &[SalesRecord]) -> Vec<(String, f64)> {
    let mut out: Vec<(String, f64)> = group_sum(records, |r| Some(r.product.as_str()))
        .into_iter()
        .collect();
    out.sort_by(|a, b| b.1.total_cmp(&a.1));
    out
}

/// Sum of totals per city, in name order. Rows without a city are left out.
pub fn city_totals(records: &[SalesRecord]) -> Vec<(String, f64)> {
    group_sum(records, |r| r.city.as_deref()).into_iter().collect()
}

/// Missing totals add nothing, but the group still appears.
fn group_sum<'a, F>(records: &'a [SalesRecord], key: F) -> BTreeMap<String, f64>
where
    F: Fn(&'a SalesRecord) -> Option<&'a str>,
{
    let mut groups: BTreeMap<String, f64> = BTreeMap::new();
    for rec in records {
        if let Some(k) = key(rec) {
            *groups.entry(k.to_string()).or_insert(0.0) += rec.total.unwrap_or(0.0);
        }
    }
    groups
}
