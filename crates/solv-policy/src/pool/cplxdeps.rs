use super::SolvableId;

/// A small boolean-dependency expression tree over already-resolved
/// candidate solvables (the output of expanding a dependency string through
/// `whatprovides`). `If(cond, then)` models libsolv's conditional
/// dependency syntax ("literal OTHERWISE expr"): it only applies `then`
/// when `cond` is not already satisfied.
#[derive(Debug, Clone)]
pub enum CplxDep {
    Literal(SolvableId),
    And(Vec<CplxDep>),
    Or(Vec<CplxDep>),
    If(SolvableId, Box<CplxDep>),
}

/// A clause in block-list form: `NOT negative[0] OR ... OR positive[0] OR ...`.
/// `policy_update_recommendsmap`'s `check_complex_dep` walks these blocks
/// looking for one the current decision state can satisfy.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DepBlock {
    pub negative: Vec<SolvableId>,
    pub positive: Vec<SolvableId>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CplxDepError {
    #[error("`or` operands must be literals or conditionals, found a nested and/or")]
    UnsupportedOrOperand,
}

/// Expands a [`CplxDep`] into the block-list CNF-ish form the recommend/
/// suggest cache consumes. This is not a general boolean-expression
/// normalizer: `Or` may only combine literals and `If` expressions, which
/// covers every shape libsolv's own dependency grammar produces.
pub fn normalize(expr: &CplxDep) -> Result<Vec<DepBlock>, CplxDepError> {
    let mut out = Vec::new();
    normalize_into(expr, &[], &mut out)?;
    Ok(out)
}

fn normalize_into(
    expr: &CplxDep,
    negative_prefix: &[SolvableId],
    out: &mut Vec<DepBlock>,
) -> Result<(), CplxDepError> {
    match expr {
        CplxDep::Literal(l) => {
            out.push(DepBlock {
                negative: negative_prefix.to_vec(),
                positive: vec![*l],
            });
            Ok(())
        }
        CplxDep::And(parts) => {
            for part in parts {
                normalize_into(part, negative_prefix, out)?;
            }
            Ok(())
        }
        CplxDep::Or(parts) => {
            let mut positive = Vec::new();
            let mut negative = negative_prefix.to_vec();
            for part in parts {
                match part {
                    CplxDep::Literal(l) => positive.push(*l),
                    CplxDep::If(cond, then) => {
                        // flatten `(cond -> then) OR ...` by treating `NOT cond`
                        // as an extra disjunct and recursing into `then`
                        negative.push(*cond);
                        normalize_into(then, &negative, out)?;
                        negative.pop();
                    }
                    _ => return Err(CplxDepError::UnsupportedOrOperand),
                }
            }
            if !positive.is_empty() {
                out.push(DepBlock { negative, positive });
            }
            Ok(())
        }
        CplxDep::If(cond, then) => {
            let mut prefix = negative_prefix.to_vec();
            prefix.push(*cond);
            normalize_into(then, &prefix, out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sid(n: u32) -> SolvableId {
        SolvableId::new(n).unwrap()
    }

    #[test]
    fn literal_expands_to_single_positive_block() {
        let blocks = normalize(&CplxDep::Literal(sid(5))).unwrap();
        assert_eq!(
            blocks,
            vec![DepBlock {
                negative: vec![],
                positive: vec![sid(5)],
            }]
        );
    }

    #[test]
    fn and_expands_to_one_block_per_operand() {
        let expr = CplxDep::And(vec![CplxDep::Literal(sid(1)), CplxDep::Literal(sid(2))]);
        let blocks = normalize(&expr).unwrap();
        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0].positive, vec![sid(1)]);
        assert_eq!(blocks[1].positive, vec![sid(2)]);
    }

    #[test]
    fn or_of_literals_collapses_into_one_block() {
        let expr = CplxDep::Or(vec![CplxDep::Literal(sid(1)), CplxDep::Literal(sid(2))]);
        let blocks = normalize(&expr).unwrap();
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].positive, vec![sid(1), sid(2)]);
        assert!(blocks[0].negative.is_empty());
    }

    #[test]
    fn if_prefixes_the_condition_as_a_negative_literal() {
        let expr = CplxDep::If(sid(9), Box::new(CplxDep::Literal(sid(1))));
        let blocks = normalize(&expr).unwrap();
        assert_eq!(blocks, vec![DepBlock {
            negative: vec![sid(9)],
            positive: vec![sid(1)],
        }]);
    }

    #[test]
    fn nested_and_inside_or_is_rejected() {
        let expr = CplxDep::Or(vec![
            CplxDep::And(vec![CplxDep::Literal(sid(1))]),
            CplxDep::Literal(sid(2)),
        ]);
        assert_eq!(normalize(&expr), Err(CplxDepError::UnsupportedOrOperand));
    }
}
