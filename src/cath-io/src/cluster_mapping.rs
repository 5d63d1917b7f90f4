use std::collections::HashMap;

use crate::error::IoError;

/// One contiguous `from-to` range over an entry's parent sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Segment {
    pub from: u32,
    pub to: u32,
}

impl Segment {
    pub fn overlaps(&self, other: &Segment) -> bool {
        self.from <= other.to && other.from <= self.to
    }
}

/// Per-cluster record of which entries have already claimed which segments.
/// Two entries of the same name claiming overlapping segments within the
/// same cluster is a [`IoError::Clash`].
#[derive(Debug, Clone, Default)]
pub struct ClusterDomains {
    by_cluster: HashMap<String, HashMap<String, Vec<Segment>>>,
}

impl ClusterDomains {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `entry_name`'s `segments` under `cluster_name`, failing if
    /// any of them overlaps a segment this same entry already claimed in
    /// this cluster.
    pub fn add_entry(
        &mut self,
        cluster_name: &str,
        entry_name: &str,
        segments: Vec<Segment>,
    ) -> Result<(), IoError> {
        let cluster = self.by_cluster.entry(cluster_name.to_string()).or_default();
        let existing = cluster.entry(entry_name.to_string()).or_default();
        for segment in &segments {
            if existing.iter().any(|e| e.overlaps(segment)) {
                return Err(IoError::Clash {
                    cluster_name: cluster_name.to_string(),
                    entry_name: entry_name.to_string(),
                });
            }
        }
        existing.extend(segments);
        Ok(())
    }

    pub fn num_clusters(&self) -> usize {
        self.by_cluster.len()
    }

    pub fn segments_of(&self, cluster_name: &str, entry_name: &str) -> &[Segment] {
        self.by_cluster
            .get(cluster_name)
            .and_then(|cluster| cluster.get(entry_name))
            .map_or(&[], Vec::as_slice)
    }
}

fn parse_segments(text: &str) -> Result<Vec<Segment>, IoError> {
    text.split(',')
        .map(|part| {
            let (from, to) = part
                .split_once('-')
                .ok_or_else(|| IoError::Parse(format!("segment '{part}' is not in 'from-to' form")))?;
            let from = from.parse::<u32>().map_err(|e| IoError::Parse(e.to_string()))?;
            let to = to.parse::<u32>().map_err(|e| IoError::Parse(e.to_string()))?;
            if from > to {
                return Err(IoError::Parse(format!("segment '{part}' has from > to")));
            }
            Ok(Segment { from, to })
        })
        .collect()
}

/// Parses cluster-mapping input lines of the form `cluster_name TAB
/// entry_name [TAB segments]`, accumulating them into a [`ClusterDomains`]
/// and surfacing `Clash` as soon as it occurs.
pub struct ClusterMappingParser;

impl ClusterMappingParser {
    pub fn parse_line(line: &str) -> Result<(String, String, Vec<Segment>), IoError> {
        let mut fields = line.split('\t');
        let cluster_name = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IoError::Parse("missing cluster_name field".to_string()))?
            .to_string();
        let entry_name = fields
            .next()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| IoError::Parse("missing entry_name field".to_string()))?
            .to_string();
        let segments = match fields.next() {
            Some(text) if !text.is_empty() => parse_segments(text)?,
            _ => Vec::new(),
        };
        Ok((cluster_name, entry_name, segments))
    }

    pub fn parse_into<'a>(
        domains: &mut ClusterDomains,
        lines: impl IntoIterator<Item = &'a str>,
    ) -> Result<(), IoError> {
        for line in lines {
            if line.is_empty() {
                continue;
            }
            let (cluster_name, entry_name, segments) = Self::parse_line(line)?;
            domains.add_entry(&cluster_name, &entry_name, segments)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_line_with_segments() {
        let (cluster, entry, segments) = ClusterMappingParser::parse_line("c1\td1\t1-10,20-30").unwrap();
        assert_eq!(cluster, "c1");
        assert_eq!(entry, "d1");
        assert_eq!(segments, vec![Segment { from: 1, to: 10 }, Segment { from: 20, to: 30 }]);
    }

    #[test]
    fn parses_a_line_without_segments() {
        let (cluster, entry, segments) = ClusterMappingParser::parse_line("c1\td1").unwrap();
        assert_eq!(cluster, "c1");
        assert_eq!(entry, "d1");
        assert!(segments.is_empty());
    }

    #[test]
    fn detects_clash_on_overlapping_segments_in_same_cluster() {
        let mut domains = ClusterDomains::new();
        let lines = vec!["c1\td1\t1-10", "c1\td1\t5-15"];
        let err = ClusterMappingParser::parse_into(&mut domains, lines).unwrap_err();
        assert!(matches!(err, IoError::Clash { .. }));
    }

    #[test]
    fn same_entry_in_different_clusters_does_not_clash() {
        let mut domains = ClusterDomains::new();
        let lines = vec!["c1\td1\t1-10", "c2\td1\t5-15"];
        ClusterMappingParser::parse_into(&mut domains, lines).unwrap();
        assert_eq!(domains.num_clusters(), 2);
    }

    #[test]
    fn non_overlapping_segments_accumulate() {
        let mut domains = ClusterDomains::new();
        let lines = vec!["c1\td1\t1-10", "c1\td1\t11-20"];
        ClusterMappingParser::parse_into(&mut domains, lines).unwrap();
        assert_eq!(domains.segments_of("c1", "d1").len(), 2);
    }
}
