//! Commutative sub-matcher types.
//!
//! Each [`SubMatcher`] becomes a unit-like struct holding its commutative pattern table, created
//! once behind a `OnceLock`, an `OperandMatcher` impl, and an operand function generated from the
//! sub-matcher's own automaton. Nested sub-matchers are emitted before the types using them.

use matchgen_automaton::SubMatcher;
use matchgen_runtime::{CommutativePattern, OperandMatcher, SequenceVariable};
use proc_macro2::{Ident, TokenStream};
use quote::{format_ident, quote};
use tracing::trace;

use crate::error::*;
use crate::generator::{CodeGenerator, index};

impl CodeGenerator {
    /// Emit `matcher` and return the name of its type.
    pub(crate) fn sub_matcher(&mut self, matcher: &SubMatcher) -> Result<Ident> {
        let number = self.matchers;
        self.matchers += 1;
        let name = format_ident!("CommutativeMatcher{}", number);
        let operands = format_ident!("match_operands_{}", number);
        trace!(
            matcher = %name,
            head = matcher.head().name(),
            operands = matcher.operands().len(),
            "emitting sub-matcher"
        );

        let head = self.head(matcher.head());
        let function = self.automaton_function(matcher.automaton(), &operands, TokenStream::new())?;
        let table: Vec<TokenStream> =
            matcher.patterns().iter().map(|pattern| self.commutative_pattern(pattern)).collect();

        self.items.push(quote! {
            struct #name {
                patterns: Vec<CommutativePattern>,
            }

            impl #name {
                fn get() -> &'static Self {
                    static INSTANCE: OnceLock<#name> = OnceLock::new();
                    INSTANCE.get_or_init(|| #name { patterns: vec![#(#table),*] })
                }
            }

            impl OperandMatcher for #name {
                fn head(&self) -> &Head {
                    &#head
                }

                fn patterns(&self) -> &[CommutativePattern] {
                    &self.patterns
                }

                fn match_operand(&self, operand: &Arc<Expr>) -> Vec<(usize, Substitution)> {
                    #operands(operand).collect()
                }
            }

            #function
        });
        Ok(name)
    }

    fn commutative_pattern(&mut self, pattern: &CommutativePattern) -> TokenStream {
        let operands = pattern.operands.iter().map(|&operand| index(operand));
        let variables: Vec<TokenStream> =
            pattern.sequence_vars.iter().map(|variable| self.sequence_variable(variable)).collect();
        quote! {
            CommutativePattern {
                operands: vec![#(#operands),*],
                sequence_vars: vec![#(#variables),*],
            }
        }
    }

    fn sequence_variable(&mut self, variable: &SequenceVariable) -> TokenStream {
        let name = match &variable.name {
            Some(name) => quote! { Some(String::from(#name)) },
            None => quote! { None },
        };
        let default = match &variable.default {
            Some(default) => {
                let value = self.expr(default);
                quote! { Some(Arc::clone(&*#value)) }
            }
            None => quote! { None },
        };
        let count = index(variable.count);
        let min_count = index(variable.min_count);
        let (fixed, wrap) = (variable.fixed, variable.wrap);
        quote! {
            SequenceVariable {
                name: #name,
                count: #count,
                min_count: #min_count,
                default: #default,
                fixed: #fixed,
                wrap: #wrap,
            }
        }
    }
}
