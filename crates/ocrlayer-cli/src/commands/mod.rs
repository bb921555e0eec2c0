pub mod engines;
pub mod markup;
pub mod ocr;
pub mod reconcile;

use ocrlayer_core::model::QuotePolicy;

fn quote_policy(drop_quotes: bool) -> QuotePolicy {
    if drop_quotes {
        QuotePolicy::Drop
    } else {
        QuotePolicy::Escape
    }
}
