//! Emission of automaton states.
//!
//! Every state becomes a function `<prefix>_sN` taking the subject queue, the substitution so far,
//! the active pattern set and the result list. A transition consumes from `subjects` through a
//! runtime guard bound to a fresh local and shadows `subjects` with it, so the queue is restored
//! whenever control leaves the guard's block.
//! Transitions are tried in automaton order, which keeps results in the interpreter's order.

use std::sync::Arc;

use matchgen_automaton::{Label, State, StateId, Transition};
use matchgen_expr::{Expr, Head};
use matchgen_pattern::{Check, Constraint};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use snafu::ResultExt;

use crate::error::*;
use crate::generator::{CodeGenerator, Scope, index};

impl CodeGenerator {
    /// Function for state `id`; commutative states are emitted inline by their transition.
    pub(crate) fn state_function(&mut self, scope: &Scope<'_>, id: StateId) -> Result<TokenStream> {
        let body = match scope.automaton.state(id) {
            State::Branch { transitions } => {
                let mut body = TokenStream::new();
                for transition in transitions {
                    let patterns = transition.patterns.iter().map(|&p| index(p));
                    let take = self.take(scope, transition)?;
                    body.extend(quote! {
                        if active.intersects_any(&[#(#patterns),*]) {
                            #take
                        }
                    });
                }
                body
            }
            State::Accept { markers } => {
                let mut accepts = TokenStream::new();
                for marker in markers {
                    let pattern = index(marker.pattern);
                    let globals = marker
                        .globals
                        .iter()
                        .map(|&id| constraint_check(scope.automaton.registry().get(id)))
                        .collect::<Result<Vec<_>>>()?;
                    let renaming = marker.renaming.iter().map(|(declared, local)| quote! { (#declared, #local) });
                    accepts.extend(quote! {
                        if active.contains(#pattern) #(&& #globals)* {
                            results.push((#pattern, subst.renamed(&[#(#renaming),*])));
                        }
                    });
                }
                quote! {
                    if subjects.is_exhausted() {
                        #accepts
                    }
                }
            }
            State::Commutative { .. } => return Ok(TokenStream::new()),
        };

        let function = scope.state_function(id);
        Ok(quote! {
            fn #function(
                subjects: &mut Subjects,
                subst: &Substitution,
                active: &PatternSet,
                results: &mut Vec<(usize, Substitution)>,
            ) {
                #body
            }
        })
    }

    fn take(&mut self, scope: &Scope<'_>, transition: &Transition) -> Result<TokenStream> {
        let tokens = match &transition.label {
            Label::Open(head) => {
                let head = self.head(head);
                let guard = self.name("entered");
                let next = self.proceed(scope, transition)?;
                quote! {
                    if let Some(mut #guard) = subjects.enter(&#head) {
                        let subjects: &mut Subjects = &mut #guard;
                        #next
                    }
                }
            }
            Label::Close => {
                let guard = self.name("closed");
                let next = self.proceed(scope, transition)?;
                quote! {
                    if let Some(mut #guard) = subjects.close() {
                        let subjects: &mut Subjects = &mut #guard;
                        #next
                    }
                }
            }
            Label::Atom(expected) => {
                let expected = self.expr(expected);
                let guard = self.name("taken");
                let next = self.proceed(scope, transition)?;
                quote! {
                    if let Some(mut #guard) = subjects.take_if(|expr| expr == &**#expected) {
                        let subjects: &mut Subjects = &mut #guard;
                        #next
                    }
                }
            }
            Label::Wildcard { symbol_kind, default } => {
                let skipped = self.default_branch(scope, transition, default.as_ref())?;
                let taking = match symbol_kind {
                    Some(kind) => {
                        let kind = format_ident!("{}", kind.to_string());
                        quote! { subjects.take_if(|expr| expr.is_symbol_of(SymbolKind::#kind)) }
                    }
                    None => quote! { subjects.take() },
                };
                let guard = self.name("taken");
                let item = self.name("item");
                let bind = self.bind(scope, transition, quote! { Binding::Single(#item) })?;
                quote! {
                    #skipped
                    if let Some(mut #guard) = #taking {
                        let #item = Arc::clone(#guard.item());
                        let subjects: &mut Subjects = &mut #guard;
                        #bind
                    }
                }
            }
            Label::Sequence { min_count, wrap, default } => {
                let skipped = self.default_branch(scope, transition, default.as_ref())?;
                let floor = index(if default.is_some() { (*min_count).max(1) } else { *min_count });
                let wrap = match wrap {
                    Some(head) => {
                        let head = self.head(head);
                        quote! { Some(&#head) }
                    }
                    None => quote! { None },
                };
                let run = self.name("run");
                let binding = self.name("binding");
                let bind = self.bind(scope, transition, quote! { #binding })?;
                quote! {
                    #skipped
                    if let Some(mut #run) = subjects.take_sequence(#floor) {
                        loop {
                            let #binding = #run.binding(#wrap);
                            {
                                let subjects: &mut Subjects = &mut #run;
                                #bind
                            }
                            if !#run.grow() {
                                break;
                            }
                        }
                    }
                }
            }
            Label::Commutative(head) => self.commutative(scope, transition, head)?,
            Label::Operands(_) => unreachable!("operand branches are emitted with their commutative state"),
        };
        Ok(tokens)
    }

    /// Binding of an optional wildcard's default, consuming nothing.
    fn default_branch(
        &mut self,
        scope: &Scope<'_>,
        transition: &Transition,
        default: Option<&Arc<Expr>>,
    ) -> Result<TokenStream> {
        let Some(default) = default else { return Ok(TokenStream::new()) };
        let value = self.expr(default);
        self.bind(scope, transition, quote! { Binding::Single(Arc::clone(&*#value)) })
    }

    fn commutative(&mut self, scope: &Scope<'_>, transition: &Transition, head: &Head) -> Result<TokenStream> {
        let State::Commutative { matcher, branches } = scope.automaton.state(transition.target) else {
            unreachable!("commutative transition to {} without a matcher", transition.target)
        };
        let matcher = &scope.matchers[*matcher];
        let head = self.head(head);
        let wanted = self.name("wanted");
        let guard = self.name("taken");
        let operation = self.name("operation");
        let pattern = self.name("pattern");
        let found = self.name("found");

        let mut requests = TokenStream::new();
        let mut arms = TokenStream::new();
        for branch in branches {
            let Label::Operands(k) = branch.label else {
                unreachable!("commutative state with a {} branch", branch.label)
            };
            let k = index(k);
            let patterns = branch.patterns.iter().map(|&p| index(p));
            requests.extend(quote! {
                if active.intersects_any(&[#(#patterns),*]) {
                    #wanted.push(#k);
                }
            });
            let next = self.proceed(scope, branch)?;
            arms.extend(quote! {
                #k => {
                    #next
                }
            });
        }

        Ok(quote! {
            let mut #wanted: Vec<usize> = Vec::new();
            #requests
            if !#wanted.is_empty() {
                if let Some(mut #guard) = subjects.take_if(|expr| expr.is_operation(&#head)) {
                    let #operation = Arc::clone(#guard.item());
                    let subjects: &mut Subjects = &mut #guard;
                    for (#pattern, #found) in match_commutative(#matcher::get(), #operation.args(), subst, &#wanted) {
                        let subst = &#found;
                        match #pattern {
                            #arms
                            _ => {}
                        }
                    }
                }
            }
        })
    }

    /// Extend the substitution with `binding` under the transition's variable, then proceed.
    fn bind(&mut self, scope: &Scope<'_>, transition: &Transition, binding: TokenStream) -> Result<TokenStream> {
        let next = self.proceed(scope, transition)?;
        let Some(variable) = &transition.variable else { return Ok(next) };
        let extended = self.name("extended");
        Ok(quote! {
            if let Some(#extended) = subst.extended(#variable, #binding) {
                let subst = &#extended;
                #next
            }
        })
    }

    /// Check the transition's constraints and call the target state unless every pattern using the
    /// transition has been refuted.
    fn proceed(&mut self, scope: &Scope<'_>, transition: &Transition) -> Result<TokenStream> {
        let target = scope.state_function(transition.target);
        let call = quote! { #target(subjects, subst, active, results); };
        if transition.constraints.is_empty() {
            return Ok(call);
        }

        let registry = scope.automaton.registry();
        let narrowed = self.name("narrowed");
        let mut checks = TokenStream::new();
        for &id in &transition.constraints {
            let check = constraint_check(registry.get(id))?;
            let owners = registry.owners(id).iter().map(|&owner| index(owner));
            checks.extend(quote! {
                if !#check {
                    #narrowed.get_or_insert_with(|| active.clone()).remove_all(&[#(#owners),*]);
                }
            });
        }
        let patterns = transition.patterns.iter().map(|&p| index(p));
        Ok(quote! {
            let mut #narrowed: Option<PatternSet> = None;
            #checks
            let active = #narrowed.as_ref().unwrap_or(active);
            if active.intersects_any(&[#(#patterns),*]) {
                #call
            }
        })
    }
}

/// Boolean expression evaluating `constraint` against `subst`; vacuously true while one of its
/// variables is unbound.
pub(crate) fn constraint_check(constraint: &Constraint) -> Result<TokenStream> {
    let names = constraint.variables();
    let call = match constraint.check() {
        Check::Builtin(predicate) => {
            let predicate: Ident = format_ident!("{}", predicate.to_string());
            quote! { Predicate::#predicate.check(args) }
        }
        Check::Custom { path, .. } => {
            let function: syn::Path = syn::parse_str(path).context(InvalidConstraintPathSnafu { path: path.clone() })?;
            quote! { #function(args) }
        }
    };
    Ok(quote! { subst.satisfies(&[#(#names),*], |args| #call) })
}
