//! Per-function symbol and write-set tables.
//!
//! Two passes over each function body build everything the model needs
//! to answer flow queries without revisiting syntax: pass one mints a
//! symbol per declarator, pass two records assignment targets,
//! expression ownership, and the values of const locals in source
//! order.

use crate::model::const_eval;
use crate::model::types::lookup;
use crate::semantics::{ConstantValue, SemanticType, SymbolId};
use crate::syntax::{CompilationUnit, Expression, ExpressionKind, NodeId, Statement};
use std::collections::{HashMap, HashSet};

/// Flow facts for one function body.
#[derive(Debug, Default)]
pub(crate) struct FunctionFlow {
    pub(crate) name: String,
    /// Resolved type of each local, by name. When a name is declared
    /// more than once the first declaration wins.
    pub(crate) local_types: HashMap<String, SemanticType>,
    /// Every symbol declared under a given name, in source order.
    pub(crate) symbols_by_name: HashMap<String, Vec<SymbolId>>,
    /// Symbols that are the target of at least one assignment.
    pub(crate) assigned: HashSet<SymbolId>,
    /// Symbols whose declarator carries an initializer.
    pub(crate) initializer_written: HashSet<SymbolId>,
    /// Values of const locals whose initializers folded, keyed by name.
    pub(crate) const_values: HashMap<String, ConstantValue>,
}

/// Unit-wide lookup tables built once per [`CompilationUnit`].
#[derive(Debug, Default)]
pub(crate) struct FlowTables {
    pub(crate) functions: Vec<FunctionFlow>,
    /// Which function each expression node belongs to.
    pub(crate) expr_function: HashMap<NodeId, usize>,
    /// Which function each local declaration belongs to.
    pub(crate) decl_function: HashMap<NodeId, usize>,
    /// The symbol minted for each declarator node.
    pub(crate) declarator_symbols: HashMap<NodeId, SymbolId>,
}

/// Builds the flow tables for every function in the unit.
///
/// `types` is the resolved type table from the same unit; declared
/// types outside it resolve to `Unresolved`.
pub(crate) fn collect(
    unit: &CompilationUnit,
    types: &HashMap<String, SemanticType>,
) -> FlowTables {
    let mut tables = FlowTables::default();
    let mut next_symbol = 0u32;

    for (index, function) in unit.functions.iter().enumerate() {
        let mut flow = FunctionFlow {
            name: function.name.clone(),
            ..FunctionFlow::default()
        };

        // Pass 1: mint a symbol per declarator and note which ones are
        // written by their own initializer.
        function.body.for_each_statement(&mut |statement| {
            let Statement::Local(decl) = statement else {
                return;
            };
            tables.decl_function.insert(decl.id, index);
            for declarator in &decl.variables {
                let symbol = SymbolId(next_symbol);
                next_symbol += 1;
                tables.declarator_symbols.insert(declarator.id, symbol);
                flow.symbols_by_name
                    .entry(declarator.name.clone())
                    .or_default()
                    .push(symbol);
                if declarator.initializer.is_some() {
                    flow.initializer_written.insert(symbol);
                }
                flow.local_types
                    .entry(declarator.name.clone())
                    .or_insert_with(|| lookup(types, &decl.declared_type.name));
            }
        });

        // Pass 2: writes, expression owners, and const values. Source
        // order matters here so a const initializer only sees consts
        // declared before it.
        function.body.for_each_statement(&mut |statement| match statement {
            Statement::Local(decl) => {
                for declarator in &decl.variables {
                    let Some(initializer) = &declarator.initializer else {
                        continue;
                    };
                    record_expression(initializer, index, &mut tables.expr_function);
                    if decl.is_const {
                        if let Some(value) = const_eval::fold(initializer, &flow.const_values) {
                            flow.const_values.insert(declarator.name.clone(), value);
                        }
                    }
                }
            }
            Statement::Assign(assign) => {
                record_expression(&assign.value, index, &mut tables.expr_function);
                // A target name marks every same-named symbol as
                // assigned. Over-approximation: it can suppress a
                // finding, never invent one.
                if let Some(symbols) = flow.symbols_by_name.get(&assign.target) {
                    flow.assigned.extend(symbols.iter().copied());
                }
            }
            Statement::Expr(expr) => record_expression(expr, index, &mut tables.expr_function),
            Statement::If(stmt) => {
                record_expression(&stmt.condition, index, &mut tables.expr_function);
            }
            Statement::While(stmt) => {
                record_expression(&stmt.condition, index, &mut tables.expr_function);
            }
            Statement::Block(_) => {}
        });

        tables.functions.push(flow);
    }

    tables
}

fn record_expression(expr: &Expression, function: usize, owners: &mut HashMap<NodeId, usize>) {
    owners.insert(expr.id, function);
    match &expr.kind {
        ExpressionKind::Literal(_) | ExpressionKind::Identifier(_) => {}
        ExpressionKind::Unary { operand, .. } => record_expression(operand, function, owners),
        ExpressionKind::Binary { left, right, .. } => {
            record_expression(left, function, owners);
            record_expression(right, function, owners);
        }
        ExpressionKind::Call { arguments, .. } => {
            for argument in arguments {
                record_expression(argument, function, owners);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::build_type_table;
    use crate::semantics::BuiltinType;
    use crate::syntax::{
        Assignment, BinaryOp, Block, Function, Literal, LocalDeclaration, Span, TypeSyntax,
        VariableDeclarator,
    };

    fn int_lit(value: i64) -> Expression {
        Expression::literal(Literal::Int(value))
    }

    fn local(is_const: bool, ty: &str, vars: Vec<(&str, Option<Expression>)>) -> Statement {
        Statement::Local(LocalDeclaration {
            id: NodeId::default(),
            is_const,
            declared_type: TypeSyntax::named(ty),
            variables: vars
                .into_iter()
                .map(|(name, initializer)| VariableDeclarator {
                    id: NodeId::default(),
                    name: name.to_string(),
                    initializer,
                    span: Span::default(),
                })
                .collect(),
            span: Span::default(),
        })
    }

    fn assign(target: &str, value: Expression) -> Statement {
        Statement::Assign(Assignment {
            id: NodeId::default(),
            target: target.to_string(),
            value,
            span: Span::default(),
        })
    }

    fn unit(statements: Vec<Statement>) -> CompilationUnit {
        let mut unit = CompilationUnit {
            source_name: "flow.test".to_string(),
            types: Vec::new(),
            conversions: Vec::new(),
            functions: vec![Function {
                name: "main".to_string(),
                return_type: None,
                body: Block {
                    statements,
                    span: Span::default(),
                },
                span: Span::default(),
            }],
        };
        unit.assign_ids();
        unit
    }

    fn collect_unit(unit: &CompilationUnit) -> FlowTables {
        let types = build_type_table(unit);
        collect(unit, &types)
    }

    fn declarator_id(unit: &CompilationUnit, statement: usize, variable: usize) -> NodeId {
        let Statement::Local(decl) = &unit.functions[0].body.statements[statement] else {
            panic!("statement {} is not a local declaration", statement);
        };
        decl.variables[variable].id
    }

    #[test]
    fn test_symbol_per_declarator() {
        let unit = unit(vec![local(
            false,
            "int",
            vec![("a", Some(int_lit(1))), ("b", Some(int_lit(2)))],
        )]);
        let tables = collect_unit(&unit);

        let a = tables.declarator_symbols[&declarator_id(&unit, 0, 0)];
        let b = tables.declarator_symbols[&declarator_id(&unit, 0, 1)];
        assert_ne!(a, b);
        assert_eq!(tables.functions[0].symbols_by_name["a"], vec![a]);
    }

    #[test]
    fn test_initializer_writes_tracked() {
        let unit = unit(vec![
            local(false, "int", vec![("a", Some(int_lit(1)))]),
            local(false, "int", vec![("b", None)]),
        ]);
        let tables = collect_unit(&unit);
        let flow = &tables.functions[0];

        let a = tables.declarator_symbols[&declarator_id(&unit, 0, 0)];
        let b = tables.declarator_symbols[&declarator_id(&unit, 1, 0)];
        assert!(flow.initializer_written.contains(&a));
        assert!(!flow.initializer_written.contains(&b));
    }

    #[test]
    fn test_assignment_marks_all_same_named_symbols() {
        let unit = unit(vec![
            local(false, "int", vec![("x", Some(int_lit(1)))]),
            Statement::Block(Block {
                statements: vec![local(false, "int", vec![("x", Some(int_lit(2)))])],
                span: Span::default(),
            }),
            assign("x", int_lit(3)),
        ]);
        let tables = collect_unit(&unit);
        assert_eq!(tables.functions[0].assigned.len(), 2);
    }

    #[test]
    fn test_first_declaration_wins_local_type() {
        let unit = unit(vec![
            local(false, "int", vec![("x", Some(int_lit(1)))]),
            local(false, "string", vec![("x", None)]),
        ]);
        let tables = collect_unit(&unit);
        assert_eq!(
            tables.functions[0].local_types["x"],
            SemanticType::Builtin(BuiltinType::Int)
        );
    }

    #[test]
    fn test_const_values_accrue_in_source_order() {
        let unit = unit(vec![
            local(true, "int", vec![("base", Some(int_lit(2)))]),
            local(
                true,
                "int",
                vec![(
                    "scaled",
                    Some(Expression::binary(
                        BinaryOp::Mul,
                        Expression::ident("base"),
                        int_lit(3),
                    )),
                )],
            ),
        ]);
        let tables = collect_unit(&unit);
        let consts = &tables.functions[0].const_values;
        assert_eq!(consts["base"], ConstantValue::Int(2));
        assert_eq!(consts["scaled"], ConstantValue::Int(6));
    }

    #[test]
    fn test_const_lookup_does_not_see_later_consts() {
        let unit = unit(vec![
            local(true, "int", vec![("early", Some(Expression::ident("late")))]),
            local(true, "int", vec![("late", Some(int_lit(1)))]),
        ]);
        let tables = collect_unit(&unit);
        let consts = &tables.functions[0].const_values;
        assert!(!consts.contains_key("early"));
        assert_eq!(consts["late"], ConstantValue::Int(1));
    }

    #[test]
    fn test_expression_owners_cover_nested_children() {
        let unit = unit(vec![assign(
            "x",
            Expression::binary(BinaryOp::Add, int_lit(1), int_lit(2)),
        )]);
        let tables = collect_unit(&unit);

        let Statement::Assign(assignment) = &unit.functions[0].body.statements[0] else {
            panic!("expected assignment");
        };
        assert_eq!(tables.expr_function[&assignment.value.id], 0);
        let ExpressionKind::Binary { left, right, .. } = &assignment.value.kind else {
            panic!("expected binary value");
        };
        assert_eq!(tables.expr_function[&left.id], 0);
        assert_eq!(tables.expr_function[&right.id], 0);
    }

    #[test]
    fn test_declarations_inside_nested_blocks_are_collected() {
        let unit = unit(vec![Statement::If(crate::syntax::IfStatement {
            condition: Expression::literal(Literal::Bool(true)),
            then_branch: Block {
                statements: vec![local(false, "int", vec![("inner", Some(int_lit(1)))])],
                span: Span::default(),
            },
            else_branch: None,
            span: Span::default(),
        })]);
        let tables = collect_unit(&unit);
        let flow = &tables.functions[0];
        assert!(flow.symbols_by_name.contains_key("inner"));
        assert_eq!(tables.decl_function.len(), 1);
    }
}
