//! Recursive-descent parser turning a token stream into a list of
//! top-level [`NodeDescriptions`] (one per `;`-separated pattern), each
//! carrying its attached [`Condition`] tree. Enforces the scoping rules
//! from the grammar: `~name` must refer to an already-declared name, a
//! name may not be declared twice in the same conjunction scope, and a
//! name may not be declared under negation.

use std::collections::HashMap;

use tracing::warn;

use crate::condition::Condition;
use crate::error::{ParseError, ParseErrorKind};
use crate::lexer::{tokenize, SpannedToken, Token};
use crate::node_description::{compile_regex_token, NodeDescriptions, NodeOp};
use crate::relation::Relation;

pub fn parse_pattern(text: &str) -> Result<Vec<NodeDescriptions>, ParseError> {
    let tokens = tokenize(text)?;
    let mut parser = Parser::new(tokens);
    let items = parser.parse_top_level()?;
    parser.expect_eof()?;
    Ok(items)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
    /// Names declared with `=ID` so far, keyed by name, valued by the
    /// predicate snapshot a later `~name` clones.
    declared: HashMap<String, NodeDescriptions>,
    /// Names visible for duplicate-declaration checking in the currently
    /// active conjunction scope(s), stacked so `Or` branches can diverge.
    scope_stack: Vec<std::collections::HashSet<String>>,
    not_depth: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Parser {
            tokens,
            pos: 0,
            declared: HashMap::new(),
            scope_stack: vec![Default::default()],
            not_depth: 0,
        }
    }

    fn eof_column(&self) -> usize {
        self.tokens.last().map(|t| t.column + 1).unwrap_or(0)
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    fn peek_column(&self) -> usize {
        self.tokens.get(self.pos).map(|t| t.column).unwrap_or_else(|| self.eof_column())
    }

    fn advance(&mut self) -> Option<Token> {
        let tok = self.tokens.get(self.pos).map(|t| t.token.clone());
        if tok.is_some() {
            self.pos += 1;
        }
        tok
    }

    fn check(&self, tok: &Token) -> bool {
        self.peek() == Some(tok)
    }

    fn expect(&mut self, tok: Token) -> Result<(), ParseError> {
        if self.check(&tok) {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(&format!("{tok:?}")))
        }
    }

    fn expect_eof(&mut self) -> Result<(), ParseError> {
        if self.pos == self.tokens.len() {
            Ok(())
        } else {
            Err(self.unexpected("end of pattern"))
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        let column = self.peek_column();
        match self.peek() {
            Some(tok) => ParseError::new(ParseErrorKind::UnexpectedToken(format!("{tok:?}")), column),
            None => ParseError::new(ParseErrorKind::UnexpectedEof(expected.to_string()), column),
        }
    }

    fn expect_id(&mut self) -> Result<String, ParseError> {
        match self.peek() {
            Some(Token::Id(_)) => match self.advance() {
                Some(Token::Id(s)) => Ok(s),
                _ => unreachable!(),
            },
            _ => Err(self.unexpected("an identifier")),
        }
    }

    // ---- top level: `;`-separated node_descriptions_list ----

    fn parse_top_level(&mut self) -> Result<Vec<NodeDescriptions>, ParseError> {
        let mut items = vec![self.parse_node_descriptions()?];
        while self.check(&Token::Semicolon) {
            self.advance();
            if self.pos == self.tokens.len() {
                break;
            }
            items.push(self.parse_node_descriptions()?);
        }
        Ok(items)
    }

    // ---- node_descriptions: disjunction + modifiers + name + attached condition ----

    fn parse_node_descriptions(&mut self) -> Result<NodeDescriptions, ParseError> {
        let mut negated = false;
        let mut use_basic_cat = false;
        loop {
            match self.peek() {
                Some(Token::Bang) => {
                    self.advance();
                    if negated {
                        warn!("redundant `!` on a node description has no additional effect");
                    }
                    negated = true;
                }
                Some(Token::At) => {
                    self.advance();
                    if use_basic_cat {
                        warn!("redundant `@` on a node description has no additional effect");
                    }
                    use_basic_cat = true;
                }
                _ => break,
            }
        }

        let mut nd = if self.check(&Token::Tilde) {
            self.advance();
            let column = self.peek_column();
            let name = self.expect_id()?;
            let snapshot = self
                .declared
                .get(&name)
                .cloned()
                .ok_or_else(|| ParseError::new(ParseErrorKind::UndeclaredName(name.clone()), column))?;
            let mut cloned = snapshot.predicate_snapshot();
            cloned.negated ^= negated;
            cloned.use_basic_cat = cloned.use_basic_cat || use_basic_cat;
            cloned
        } else if self.check(&Token::LParen) {
            // A node_descriptions wrapped whole in parens, e.g. `(DT|JJ)` or
            // `(~a $- foo)`: recurse into a full nested node_descriptions
            // (which parses its own disjunction, name, and attached
            // condition) rather than a single disjunct atom, since the
            // content may itself be a `~name` link or carry a condition.
            self.advance();
            let mut inner = self.parse_node_descriptions()?;
            self.expect(Token::RParen)?;
            inner.negated ^= negated;
            inner.use_basic_cat = inner.use_basic_cat || use_basic_cat;
            inner
        } else {
            let mut disjuncts = vec![self.parse_node_description_atom()?];
            while self.check(&Token::OrNode) {
                self.advance();
                disjuncts.push(self.parse_node_description_atom()?);
            }
            let mut nd = NodeDescriptions::new(disjuncts);
            nd.negated = negated;
            nd.use_basic_cat = use_basic_cat;
            nd
        };

        if self.check(&Token::Eq) {
            let column = self.peek_column();
            self.advance();
            let name = self.expect_id()?;
            if self.not_depth > 0 {
                return Err(ParseError::new(ParseErrorKind::NameUnderNegation(name), column));
            }
            let scope = self.scope_stack.last_mut().expect("scope stack never empty");
            if !scope.insert(name.clone()) {
                return Err(ParseError::new(ParseErrorKind::DuplicateName(name), column));
            }
            nd.name = Some(name.clone());
            self.declared.insert(name, nd.predicate_snapshot());
        }

        if let Some(condition) = self.parse_attached_condition()? {
            nd.condition = Some(Box::new(condition));
        }
        Ok(nd)
    }

    fn parse_node_description_atom(&mut self) -> Result<NodeOp, ParseError> {
        let column = self.peek_column();
        match self.peek() {
            Some(Token::Id(_) | Token::Regex(..) | Token::Blank | Token::Root) => match self.advance() {
                Some(Token::Id(s)) => Ok(NodeOp::Id(s)),
                Some(Token::Regex(pattern, flags)) => {
                    Ok(NodeOp::Regex(compile_regex_token(&pattern, &flags, column)?))
                }
                Some(Token::Blank) => Ok(NodeOp::Any),
                Some(Token::Root) => Ok(NodeOp::Root),
                _ => unreachable!(),
            },
            Some(Token::LParen) => {
                self.advance();
                let op = self.parse_node_description_atom()?;
                self.expect(Token::RParen)?;
                Ok(op)
            }
            _ => Err(self.unexpected("a node description")),
        }
    }

    // ---- attached condition: implicit AND, `||`-separated OR ----

    fn can_start_condition(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Relation(_))
                | Some(Token::RelWithArg(_))
                | Some(Token::MultiRelation)
                | Some(Token::Bang)
                | Some(Token::Question)
                | Some(Token::Amp)
                | Some(Token::LParen)
                | Some(Token::LBracket)
        )
    }

    fn parse_attached_condition(&mut self) -> Result<Option<Condition>, ParseError> {
        if !self.can_start_condition() {
            return Ok(None);
        }
        self.parse_and_or_sequence()
    }

    /// Parses one or more implicit-AND condition terms, optionally split
    /// into alternatives by `||`, until a non-condition-starting token.
    fn parse_and_or_sequence(&mut self) -> Result<Option<Condition>, ParseError> {
        let pre_scope = self.scope_stack.last().cloned().unwrap_or_default();
        self.scope_stack.push(pre_scope.clone());
        let mut branches: Vec<Vec<Condition>> = vec![vec![]];
        // Each `||` alternative gets its own independent name-scope, seeded
        // from `pre_scope`, so sibling branches may each declare the same
        // name (e.g. `< B=foo || < C=foo`) without tripping the
        // duplicate-name check.
        let mut branch_scopes = vec![pre_scope.clone()];
        loop {
            if self.check(&Token::OrRel) {
                self.advance();
                *self.scope_stack.last_mut().unwrap() = pre_scope.clone();
                branches.push(vec![]);
                branch_scopes.push(pre_scope.clone());
                continue;
            }
            if !self.can_start_condition() {
                break;
            }
            let term = self.parse_condition_term()?;
            branches.last_mut().unwrap().push(term);
            *branch_scopes.last_mut().unwrap() = self.scope_stack.last().cloned().unwrap();
        }
        // names declared in any branch become visible to whatever follows.
        let mut merged = pre_scope;
        for s in &branch_scopes {
            merged.extend(s.iter().cloned());
        }
        self.scope_stack.pop();
        if let Some(top) = self.scope_stack.last_mut() {
            *top = merged;
        }

        let ands: Vec<Condition> = branches.into_iter().map(mk_and).collect();
        if ands.len() == 1 {
            if let Condition::And(v) = &ands[0] {
                if v.is_empty() {
                    return Ok(None);
                }
            }
        }
        Ok(Some(mk_or(ands)))
    }

    /// Parses a delimited and/or group, e.g. the contents of `(...)` or
    /// `[...]`, consuming the closing delimiter.
    fn parse_bracketed(&mut self, close: Token) -> Result<Condition, ParseError> {
        let inner = self.parse_and_or_sequence()?;
        self.expect(close)?;
        Ok(inner.unwrap_or_else(|| mk_and(vec![])))
    }

    fn parse_condition_term(&mut self) -> Result<Condition, ParseError> {
        match self.peek() {
            Some(Token::Bang) => {
                self.advance();
                self.not_depth += 1;
                let inner = if self.check(&Token::MultiRelation) {
                    self.parse_multi_relation()
                } else {
                    self.parse_condition_term()
                };
                self.not_depth -= 1;
                Ok(Condition::Not(Box::new(inner?)))
            }
            Some(Token::Question) => {
                self.advance();
                let inner = if self.check(&Token::MultiRelation) {
                    self.parse_multi_relation()?
                } else {
                    self.parse_condition_term()?
                };
                Ok(Condition::Opt(Box::new(inner)))
            }
            Some(Token::Amp) => {
                self.advance();
                self.parse_condition_term()
            }
            Some(Token::LParen) => {
                self.advance();
                self.parse_bracketed(Token::RParen)
            }
            Some(Token::LBracket) => {
                self.advance();
                self.parse_bracketed(Token::RBracket)
            }
            Some(Token::MultiRelation) => self.parse_multi_relation(),
            Some(Token::Relation(_)) | Some(Token::RelWithArg(_)) => self.parse_leaf(),
            _ => Err(self.unexpected("a condition")),
        }
    }

    fn parse_leaf(&mut self) -> Result<Condition, ParseError> {
        let relation = self.parse_relation_data()?;
        let nd = self.parse_node_descriptions()?;
        Ok(Condition::Leaf(relation, nd))
    }

    fn parse_relation_data(&mut self) -> Result<Relation, ParseError> {
        let column = self.peek_column();
        match self.advance() {
            Some(Token::Relation(sym)) => {
                if matches!(sym.as_str(), "<" | ">" | "<<<" | "<<<-") {
                    if let Some(Token::Number(_)) = self.peek() {
                        let n = match self.advance() {
                            Some(Token::Number(n)) => n,
                            _ => unreachable!(),
                        };
                        if n == 0 {
                            return Err(ParseError::new(ParseErrorKind::ZeroChildIndex, column));
                        }
                        return Ok(match sym.as_str() {
                            "<" => Relation::HasIthChild(n),
                            ">" => Relation::IthChildOf(n),
                            "<<<" => Relation::AncestorOfIthLeaf(n),
                            "<<<-" => Relation::AncestorOfIthLeaf(-n),
                            _ => unreachable!(),
                        });
                    }
                    if matches!(sym.as_str(), "<<<" | "<<<-") {
                        return Err(self.unexpected("a leaf index"));
                    }
                }
                symbol_to_relation(&sym, column)
            }
            Some(Token::RelWithArg(sym)) => {
                self.expect(Token::LParen)?;
                let nd = self.parse_node_descriptions()?;
                self.expect(Token::RParen)?;
                Ok(match sym.as_str() {
                    "<+" => Relation::UnbrokenCategoryDominates(Box::new(nd)),
                    ">+" => Relation::UnbrokenCategoryIsDominatedBy(Box::new(nd)),
                    ".+" => Relation::UnbrokenCategoryPrecedes(Box::new(nd)),
                    ",+" => Relation::UnbrokenCategoryFollows(Box::new(nd)),
                    _ => unreachable!(),
                })
            }
            _ => Err(self.unexpected("a relation")),
        }
    }

    fn parse_multi_relation(&mut self) -> Result<Condition, ParseError> {
        self.expect(Token::MultiRelation)?;
        self.expect(Token::LBrace)?;
        if self.check(&Token::RBrace) {
            let column = self.peek_column();
            return Err(ParseError::new(ParseErrorKind::EmptyMultiRelationArgs, column));
        }
        let mut items = vec![self.parse_node_descriptions()?];
        while self.check(&Token::Semicolon) {
            self.advance();
            items.push(self.parse_node_descriptions()?);
        }
        self.expect(Token::RBrace)?;

        let mut ands = Vec::with_capacity(items.len() + 1);
        for (i, nd) in items.into_iter().enumerate() {
            ands.push(Condition::Leaf(Relation::HasIthChild((i + 1) as i32), nd));
        }
        let k = ands.len();
        ands.push(Condition::Not(Box::new(Condition::Leaf(
            Relation::HasIthChild((k + 1) as i32),
            NodeDescriptions::new(vec![NodeOp::Any]),
        ))));
        Ok(Condition::And(ands))
    }
}

fn mk_and(mut terms: Vec<Condition>) -> Condition {
    if terms.len() == 1 {
        terms.pop().unwrap()
    } else {
        Condition::And(terms)
    }
}

fn mk_or(mut branches: Vec<Condition>) -> Condition {
    if branches.len() == 1 {
        branches.pop().unwrap()
    } else {
        Condition::Or(branches)
    }
}

fn symbol_to_relation(sym: &str, column: usize) -> Result<Relation, ParseError> {
    use Relation::*;
    Ok(match sym {
        "<" => ImmediatelyDominates,
        ">" => ImmediatelyDominatedBy,
        "<<" => Dominates,
        ">>" => DominatedBy,
        "<:" => HasOnlyChild,
        ">:" => OnlyChildOf,
        "<," => HasLeftmostChild,
        ">," => LeftmostChildOf,
        "<-" | "<`" => HasRightmostChild,
        ">-" | ">`" => RightmostChildOf,
        "<<," => HasLeftmostDescendant,
        ">>," => LeftmostDescendantOf,
        "<<-" => HasRightmostDescendant,
        ">>-" => RightmostDescendantOf,
        "$" => SisterOf,
        "$.." | "$++" => LeftSisterOf,
        "$,," | "$--" => RightSisterOf,
        "$." | "$+" => ImmediateLeftSisterOf,
        "$," | "$-" => ImmediateRightSisterOf,
        "==" => Equals,
        "<=" => ParentEquals,
        "<<:" => UnaryPathAncestorOf,
        ">>:" => UnaryPathDescendantOf,
        ".." => Precedes,
        ",," => Follows,
        "." => ImmediatelyPrecedes,
        "," => ImmediatelyFollows,
        ":" => AnyNode,
        "<#" => ImmediatelyHeadedBy,
        ">#" => ImmediatelyHeads,
        "<<#" => HeadedBy,
        ">>#" => Heads,
        other => {
            return Err(ParseError::new(ParseErrorKind::UnexpectedToken(other.to_string()), column));
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_parse_wildcard() {
        let items = parse_pattern("__").unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].condition.is_none());
    }

    #[test]
    fn test_parse_regex_pattern() {
        let items = parse_pattern("/^MW/").unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_parse_dominance_condition() {
        let items = parse_pattern("foo << bar").unwrap();
        assert_eq!(items.len(), 1);
        assert!(items[0].condition.is_some());
    }

    #[test]
    fn test_parse_multi_child_relation() {
        let items = parse_pattern("A <... { B ; C ; D }").unwrap();
        match items[0].condition.as_deref() {
            Some(Condition::And(v)) => assert_eq!(v.len(), 4),
            other => panic!("expected And, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_or_conditions_with_backrefs() {
        let items = parse_pattern("A ?[< B=foo || < C=foo]").unwrap();
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0].condition.as_deref(), Some(Condition::Opt(_))));
    }

    #[test]
    fn test_parenthesized_disjunction_as_relation_rhs() {
        let items = parse_pattern("NP < (DT|JJ)").unwrap();
        match items[0].condition.as_deref() {
            Some(Condition::Leaf(_, nd)) => assert_eq!(nd.descriptions.len(), 2),
            other => panic!("expected Leaf, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_link_reference() {
        let items = parse_pattern("bar=a $- (~a $- foo)").unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name.as_deref(), Some("bar"));
    }

    #[test]
    fn test_undeclared_backref_is_error() {
        let err = parse_pattern("A $- ~missing").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::UndeclaredName(_)));
    }

    #[test]
    fn test_duplicate_name_same_scope_is_error() {
        let err = parse_pattern("A < B=x < C=x").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::DuplicateName(_)));
    }

    #[test]
    fn test_same_name_in_sibling_or_branches_is_not_an_error() {
        let items = parse_pattern("A ?[< B=foo || < C=foo]").unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_duplicate_name_within_one_or_branch_is_still_an_error() {
        let err = parse_pattern("A [< B=foo < C=foo || < D]").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::DuplicateName(_)));
    }

    #[test]
    fn test_name_under_negation_is_error() {
        let err = parse_pattern("A !< B=x").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::NameUnderNegation(_)));
    }

    #[test]
    fn test_zero_child_index_is_error() {
        let err = parse_pattern("A < 0").unwrap_err();
        assert!(matches!(err.kind, ParseErrorKind::ZeroChildIndex));
    }

    #[test]
    fn test_semicolon_separated_top_level() {
        let items = parse_pattern("A ; B ; C").unwrap();
        assert_eq!(items.len(), 3);
    }

    #[test]
    fn test_negation_and_basic_cat_modifiers() {
        let items = parse_pattern("@!foo").unwrap();
        assert!(items[0].negated);
        assert!(items[0].use_basic_cat);
    }
}
