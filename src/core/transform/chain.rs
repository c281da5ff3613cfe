use super::transformation_for;
use crate::core::outcome::Outcome;
use flowsmith_types::TransformStep;
use serde_json::Value;

/// Value produced by a chain run together with how many steps it applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ChainOutput {
    pub value: Value,
    pub applied: usize,
}

/// Apply `steps` in order, feeding each step's output into the next.
///
/// Unknown kinds are skipped. If any step fails the whole chain is abandoned
/// and the value from before the first step is returned as a degraded outcome.
pub fn apply_all(value: Value, steps: &[TransformStep]) -> Outcome<ChainOutput> {
    if steps.is_empty() {
        return Outcome::Ok(ChainOutput { value, applied: 0 });
    }

    let original = value.clone();
    let mut current = value;
    let mut applied = 0;
    let mut skipped = Vec::new();

    for (index, step) in steps.iter().enumerate() {
        let Some(kind) = step.resolved_kind() else {
            tracing::warn!(step = index, kind = %step.kind, "unknown transformation kind; skipping step");
            skipped.push(step.kind.clone());
            continue;
        };

        match transformation_for(kind).apply(current, step.config.as_ref()) {
            Ok(next) => {
                tracing::debug!(step = index, %kind, "transformation applied");
                current = next;
                applied += 1;
            }
            Err(err) => {
                tracing::warn!(step = index, %kind, error = %err, "transformation failed; reverting chain");
                return Outcome::degraded(
                    ChainOutput {
                        value: original,
                        applied: 0,
                    },
                    format!("step {} ({}) failed: {}", index, kind, err),
                );
            }
        }
    }

    let output = ChainOutput {
        value: current,
        applied,
    };
    if skipped.is_empty() {
        Outcome::Ok(output)
    } else {
        Outcome::degraded(
            output,
            format!("skipped unknown transformation kinds: {}", skipped.join(", ")),
        )
    }
}
