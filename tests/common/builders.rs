//! Test data builders for creating test objects

use hierscope::RawRecord;

/// Builder for creating test records
pub struct RecordBuilder {
    record: RawRecord,
}

impl RecordBuilder {
    pub fn new(hier: &str, connnecting_hier: &str) -> Self {
        Self {
            record: RawRecord::new(hier, connnecting_hier),
        }
    }

    pub fn connections(mut self, connections: u64) -> Self {
        self.record.connections = connections;
        self
    }

    pub fn wns(mut self, wns: f64) -> Self {
        self.record.wns = wns;
        self
    }

    pub fn tns(mut self, tns: f64) -> Self {
        self.record.tns = tns;
        self
    }

    pub fn to(mut self) -> Self {
        self.record.direction = "to".to_string();
        self
    }

    pub fn from(mut self) -> Self {
        self.record.direction = "from".to_string();
        self
    }

    pub fn build(self) -> RawRecord {
        self.record
    }
}

/// Builder for delimited timing exports
pub struct CsvBuilder {
    delimiter: char,
    rows: Vec<RawRecord>,
}

impl CsvBuilder {
    pub fn new() -> Self {
        Self {
            delimiter: ',',
            rows: Vec::new(),
        }
    }

    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    pub fn row(mut self, record: RawRecord) -> Self {
        self.rows.push(record);
        self
    }

    pub fn build(self) -> String {
        let d = self.delimiter;
        let mut out = format!(
            "hier{d}connnecting_hier{d}connections{d}wns{d}tns{d}direction\n"
        );
        for r in &self.rows {
            out.push_str(&format!(
                "{}{d}{}{d}{}{d}{}{d}{}{d}{}\n",
                r.hier, r.connnecting_hier, r.connections, r.wns, r.tns, r.direction
            ));
        }
        out
    }
}

/// The two records from the reference scenarios: a forward edge between
/// siblings and a reversed edge into a child.
pub fn scenario_records() -> Vec<RawRecord> {
    vec![
        RecordBuilder::new("top/a", "top/b")
            .connections(5)
            .wns(-2.5)
            .tns(-10.0)
            .to()
            .build(),
        RecordBuilder::new("top/a", "top/a/child").from().build(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_builder() {
        let record = RecordBuilder::new("top/a", "top/b")
            .connections(3)
            .wns(-1.0)
            .to()
            .build();

        assert_eq!(record.hier, "top/a");
        assert_eq!(record.connections, 3);
        assert_eq!(record.wns, -1.0);
        assert_eq!(record.direction, "to");
    }

    #[test]
    fn test_csv_builder() {
        let text = CsvBuilder::new()
            .delimiter(';')
            .row(RecordBuilder::new("a", "b").wns(-0.5).build())
            .build();
        assert_eq!(
            text,
            "hier;connnecting_hier;connections;wns;tns;direction\na;b;0;-0.5;0;\n"
        );
    }
}
