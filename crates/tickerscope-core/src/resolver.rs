//! Symbol resolution.
//!
//! A raw ticker plus a [`MarketType`] is turned into the one canonical
//! [`Symbol`] the provider understands. Resolution is an ordered list of
//! [`ResolutionRule`]s tried in sequence; the first rule whose predicate
//! matches and that settles on a candidate wins.
//!
//! Default rule order:
//!
//! | Rule | Applies to | Candidates | On no positive probe |
//! |------|------------|------------|----------------------|
//! | `canonical` | already suffixed for the market, or `^` index | the input | n/a |
//! | `special_case` | known aliases, any market | alias table order | fall through |
//! | `indian_heuristic` | Indian, base has digit, `&` or `-` | `.NS`, `.BO` | default to `.NS` |
//! | `indian_default` | Indian | `.NS` | n/a |
//! | `crypto` | Crypto | `-USD` | n/a |
//! | `commodity` | Commodity | `=F` | n/a |
//! | `passthrough` | everything else | the input | n/a |
//!
//! The resolver never fails because a probe came back negative; the only
//! error it returns is a [`ValidationError`] for input that cannot be a
//! symbol at all.

use std::collections::BTreeMap;
use std::fmt::{Debug, Formatter};
use std::sync::Arc;

use tracing::{debug, info};

use crate::data_source::MarketDataProvider;
use crate::probe::probe;
use crate::{
    MarketType, Symbol, ValidationError, BSE_SUFFIX, COMMODITY_SUFFIX, CRYPTO_SUFFIX, NSE_SUFFIX,
};

type Predicate = Box<dyn Fn(&Symbol, MarketType) -> bool + Send + Sync>;
type CandidateGenerator = Box<dyn Fn(&Symbol) -> Vec<String> + Send + Sync>;

/// What a rule does once its predicate has matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// Take the first candidate without asking the provider.
    First,
    /// Probe candidates in order and take the first one with data.
    Probe { on_exhausted: Exhaustion },
}

/// Outcome of a probing rule when no candidate answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Exhaustion {
    /// Let the next rule try.
    FallThrough,
    /// Settle on the first candidate anyway.
    UseFirst,
}

/// One (predicate, candidate generator, selection) entry of the rule list.
pub struct ResolutionRule {
    name: &'static str,
    predicate: Predicate,
    candidates: CandidateGenerator,
    selection: Selection,
}

impl ResolutionRule {
    pub fn new<P, C>(name: &'static str, predicate: P, candidates: C, selection: Selection) -> Self
    where
        P: Fn(&Symbol, MarketType) -> bool + Send + Sync + 'static,
        C: Fn(&Symbol) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            name,
            predicate: Box::new(predicate),
            candidates: Box::new(candidates),
            selection,
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn applies(&self, symbol: &Symbol, market: MarketType) -> bool {
        (self.predicate)(symbol, market)
    }

    /// Candidate symbols in preference order.
    pub fn candidates(&self, symbol: &Symbol) -> Result<Vec<Symbol>, ValidationError> {
        (self.candidates)(symbol)
            .iter()
            .map(|candidate| Symbol::parse(candidate))
            .collect()
    }
}

impl Debug for ResolutionRule {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolutionRule")
            .field("name", &self.name)
            .field("selection", &self.selection)
            .finish_non_exhaustive()
    }
}

/// Result of a resolution with the rule that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub symbol: Symbol,
    pub rule: &'static str,
    pub probes: usize,
}

/// Known aliases whose listing cannot be derived from the name alone.
pub const DEFAULT_SPECIAL_CASES: &[(&str, &[&str])] = &[
    ("IRCTC", &["IRCTC.NS", "IRCTC.BO"]),
    ("NIFTY50", &["^NSEI"]),
    ("SENSEX", &["^BSESN"]),
];

/// Heuristic for bare tickers that are likely Indian listings.
pub fn looks_indian(base: &str) -> bool {
    base.chars()
        .any(|ch| ch.is_ascii_digit() || ch == '&' || ch == '-')
}

/// Stateless rule-list resolver.
#[derive(Debug)]
pub struct SymbolResolver {
    rules: Vec<ResolutionRule>,
    special_cases: Arc<BTreeMap<String, Vec<String>>>,
}

impl Default for SymbolResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl SymbolResolver {
    /// Resolver with the default alias table.
    pub fn new() -> Self {
        Self::with_special_cases(DEFAULT_SPECIAL_CASES.iter().map(|(alias, candidates)| {
            (
                (*alias).to_owned(),
                candidates.iter().map(|c| (*c).to_owned()).collect(),
            )
        }))
    }

    /// Resolver with the default rule order and a custom alias table.
    pub fn with_special_cases<I>(special_cases: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let special_cases = Arc::new(
            special_cases
                .into_iter()
                .map(|(alias, candidates)| (alias.trim().to_ascii_uppercase(), candidates))
                .collect::<BTreeMap<_, _>>(),
        );
        Self {
            rules: default_rules(Arc::clone(&special_cases)),
            special_cases,
        }
    }

    /// Resolver with an entirely custom rule list.
    pub fn with_rules(rules: Vec<ResolutionRule>) -> Self {
        Self {
            rules,
            special_cases: Arc::new(BTreeMap::new()),
        }
    }

    pub fn rules(&self) -> &[ResolutionRule] {
        &self.rules
    }

    pub fn is_special_case(&self, raw: &str) -> bool {
        self.special_cases
            .contains_key(&raw.trim().to_ascii_uppercase())
    }

    pub async fn resolve(
        &self,
        provider: &dyn MarketDataProvider,
        raw: &str,
        market: MarketType,
    ) -> Result<Symbol, ValidationError> {
        self.resolve_detailed(provider, raw, market)
            .await
            .map(|resolution| resolution.symbol)
    }

    /// Resolve and report which rule settled the symbol.
    pub async fn resolve_detailed(
        &self,
        provider: &dyn MarketDataProvider,
        raw: &str,
        market: MarketType,
    ) -> Result<Resolution, ValidationError> {
        let input = Symbol::parse(raw)?;
        let mut probes = 0;

        for rule in &self.rules {
            if !rule.applies(&input, market) {
                continue;
            }

            let candidates = rule.candidates(&input)?;
            let Some(first) = candidates.first().cloned() else {
                continue;
            };

            let chosen = match rule.selection {
                Selection::First => Some(first),
                Selection::Probe { on_exhausted } => {
                    let mut found = None;
                    for candidate in candidates {
                        probes += 1;
                        if probe(provider, &candidate).await {
                            found = Some(candidate);
                            break;
                        }
                    }
                    match (found, on_exhausted) {
                        (Some(symbol), _) => Some(symbol),
                        (None, Exhaustion::UseFirst) => {
                            debug!(rule = rule.name, default = %first, "no candidate answered, using default");
                            Some(first)
                        }
                        (None, Exhaustion::FallThrough) => {
                            debug!(rule = rule.name, input = %input, "no candidate answered, trying next rule");
                            None
                        }
                    }
                }
            };

            if let Some(symbol) = chosen {
                info!(raw, market = %market, symbol = %symbol, rule = rule.name, probes, "resolved symbol");
                return Ok(Resolution {
                    symbol,
                    rule: rule.name,
                    probes,
                });
            }
        }

        // The default list ends with an unconditional passthrough; a custom
        // list may not.
        Ok(Resolution {
            symbol: input,
            rule: "unmatched",
            probes,
        })
    }
}

fn default_rules(special_cases: Arc<BTreeMap<String, Vec<String>>>) -> Vec<ResolutionRule> {
    let lookup = Arc::clone(&special_cases);

    vec![
        ResolutionRule::new(
            "canonical",
            |symbol, market| symbol.is_index() || market.has_recognized_suffix(symbol.as_str()),
            |symbol| vec![symbol.as_str().to_owned()],
            Selection::First,
        ),
        ResolutionRule::new(
            "special_case",
            move |symbol, _| special_cases.contains_key(symbol.as_str()),
            move |symbol| lookup.get(symbol.as_str()).cloned().unwrap_or_default(),
            Selection::Probe {
                on_exhausted: Exhaustion::FallThrough,
            },
        ),
        ResolutionRule::new(
            "indian_heuristic",
            |symbol, market| market == MarketType::Indian && looks_indian(symbol.as_str()),
            |symbol| vec![format!("{symbol}{NSE_SUFFIX}"), format!("{symbol}{BSE_SUFFIX}")],
            Selection::Probe {
                on_exhausted: Exhaustion::UseFirst,
            },
        ),
        ResolutionRule::new(
            "indian_default",
            |_, market| market == MarketType::Indian,
            |symbol| vec![format!("{symbol}{NSE_SUFFIX}")],
            Selection::First,
        ),
        ResolutionRule::new(
            "crypto",
            |_, market| market == MarketType::Crypto,
            |symbol| vec![format!("{symbol}{CRYPTO_SUFFIX}")],
            Selection::First,
        ),
        ResolutionRule::new(
            "commodity",
            |_, market| market == MarketType::Commodity,
            |symbol| vec![format!("{symbol}{COMMODITY_SUFFIX}")],
            Selection::First,
        ),
        ResolutionRule::new(
            "passthrough",
            |_, _| true,
            |symbol| vec![symbol.as_str().to_owned()],
            Selection::First,
        ),
    ]
}
