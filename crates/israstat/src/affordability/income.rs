/// One row of the gross-to-net table. `upper_bound` of `None` closes the table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NetIncomeBracket {
    pub upper_bound: Option<f64>,
    pub retention: f64,
}

/// Monthly gross-to-net retention, ascending by upper bound; first match wins.
///
/// Each rate applies to the whole gross amount rather than to the slice inside
/// the bracket, so net income steps down when crossing a boundary.
pub const NET_INCOME_BRACKETS: [NetIncomeBracket; 6] = [
    NetIncomeBracket {
        upper_bound: Some(7_010.0),
        retention: 0.88,
    },
    NetIncomeBracket {
        upper_bound: Some(10_060.0),
        retention: 0.82,
    },
    NetIncomeBracket {
        upper_bound: Some(16_150.0),
        retention: 0.74,
    },
    NetIncomeBracket {
        upper_bound: Some(22_440.0),
        retention: 0.68,
    },
    NetIncomeBracket {
        upper_bound: Some(46_690.0),
        retention: 0.62,
    },
    NetIncomeBracket {
        upper_bound: None,
        retention: 0.54,
    },
];

/// Approximate monthly net (Netto) from gross (Bruto) income, covering
/// national insurance, health tax and income tax in one retention rate.
pub fn estimate_net_income(gross: f64) -> f64 {
    gross * retention_for(gross)
}

fn retention_for(gross: f64) -> f64 {
    NET_INCOME_BRACKETS
        .iter()
        .find(|bracket| bracket.upper_bound.map_or(true, |upper| gross <= upper))
        .map_or(0.54, |bracket| bracket.retention)
}
