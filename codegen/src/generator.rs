//! Generator state and output.
//!
//! The generator owns everything that spans a whole generated file: the temporary-name counter,
//! deduplicated `static` items for heads and expressions, and the items emitted for sub-matchers.
//! [`CodeGenerator::generate`] resets that state first, so one generator can be reused and always
//! produces the same text for the same automaton.

use std::fmt;
use std::sync::Arc;

use bon::bon;
use matchgen_automaton::{Automaton, StateId};
use matchgen_expr::{Expr, Head, OpKind};
use proc_macro2::{Ident, Literal, TokenStream};
use quote::{ToTokens, format_ident, quote};
use snafu::{ResultExt, ensure};
use tracing::debug;

use crate::error::*;

/// Entry point name used when none is configured.
pub const DEFAULT_FUNCTION: &str = "match_root";

/// Prefixes of generated value items; entry points may not start with them.
const RESERVED_PREFIXES: &[&str] = &["match_operands_", "HEAD_", "EXPR_"];

/// Emits Rust matchers for automata.
#[derive(Debug, Clone)]
pub struct CodeGenerator {
    function_name: String,
    pub(crate) counter: usize,
    pub(crate) matchers: usize,
    heads: Vec<(Head, Ident)>,
    exprs: Vec<(Arc<Expr>, Ident)>,
    pub(crate) items: Vec<TokenStream>,
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[bon]
impl CodeGenerator {
    #[builder]
    pub fn new(#[builder(into, default = DEFAULT_FUNCTION.to_owned())] function_name: String) -> Self {
        Self { function_name, counter: 0, matchers: 0, heads: Vec::new(), exprs: Vec::new(), items: Vec::new() }
    }
}

impl CodeGenerator {
    pub fn function_name(&self) -> &str {
        &self.function_name
    }

    /// Generate a module matching every pattern of `automaton`.
    ///
    /// The entry point has the signature
    /// `pub fn <name>(subject: &Arc<Expr>) -> std::vec::IntoIter<(usize, Substitution)>`.
    pub fn generate(&mut self, automaton: &Automaton) -> Result<GeneratedCode> {
        self.reset();
        let function: Ident = syn::parse_str(&self.function_name)
            .context(InvalidFunctionNameSnafu { name: self.function_name.clone() })?;
        ensure!(!is_reserved(&function.to_string()), ReservedFunctionNameSnafu { name: self.function_name.clone() });

        let body = self.automaton_function(automaton, &function, quote!(pub))?;
        let items = std::mem::take(&mut self.items);
        let tokens = quote! {
            #![allow(unused_imports, unused_variables, unused_mut, clippy::all)]

            use std::sync::{Arc, LazyLock, OnceLock};

            use ::matchgen_expr::{Expr, Head, OpKind, SymbolKind};
            use ::matchgen_runtime::{
                Binding, CommutativePattern, OperandMatcher, PatternSet, Predicate, SequenceVariable, Subjects,
                Substitution, match_commutative,
            };

            #(#items)*

            #body
        };
        let file = syn::parse2::<syn::File>(tokens).context(ParseSnafu)?;

        debug!(
            function = %function,
            patterns = automaton.pattern_count(),
            states = automaton.state_count(),
            matchers = self.matchers,
            "generated matcher"
        );
        Ok(GeneratedCode {
            function: function.to_string(),
            pattern_count: automaton.pattern_count(),
            matcher_count: self.matchers,
            file,
        })
    }

    fn reset(&mut self) {
        self.counter = 0;
        self.matchers = 0;
        self.heads.clear();
        self.exprs.clear();
        self.items.clear();
    }

    /// Matcher function `name` over `automaton` plus one private function per state.
    ///
    /// Sub-matchers of `automaton` are emitted into the shared items first.
    pub(crate) fn automaton_function(
        &mut self,
        automaton: &Automaton,
        name: &Ident,
        visibility: TokenStream,
    ) -> Result<TokenStream> {
        let matchers = automaton.matchers().iter().map(|matcher| self.sub_matcher(matcher)).collect::<Result<_>>()?;
        let scope = Scope { automaton, prefix: name.clone(), matchers };

        let mut states = TokenStream::new();
        for (id, _) in automaton.states() {
            states.extend(self.state_function(&scope, id)?);
        }

        let root = scope.state_function(StateId::ROOT);
        let count = index(automaton.pattern_count());
        Ok(quote! {
            #visibility fn #name(subject: &Arc<Expr>) -> std::vec::IntoIter<(usize, Substitution)> {
                let mut results: Vec<(usize, Substitution)> = Vec::new();
                let mut subjects = Subjects::new(Arc::clone(subject));
                #root(&mut subjects, &Substitution::new(), &PatternSet::full(#count), &mut results);
                results.into_iter()
            }

            #states
        })
    }

    /// Fresh identifier `{base}_{n}`.
    pub(crate) fn name(&mut self, base: &str) -> Ident {
        self.counter += 1;
        format_ident!("{}_{}", base, self.counter)
    }

    /// `static` holding `head`, declared on first use.
    pub(crate) fn head(&mut self, head: &Head) -> Ident {
        if let Some((_, ident)) = self.heads.iter().find(|(known, _)| known == head) {
            return ident.clone();
        }
        let ident = format_ident!("HEAD_{}", self.heads.len());
        let name = head.name();
        let kind = format_ident!("{}", op_kind(head.kind()));
        self.items.push(quote! {
            static #ident: Head = Head::from_static(#name, OpKind::#kind);
        });
        self.heads.push((head.clone(), ident.clone()));
        ident
    }

    /// Lazily built `static` holding `expr`, declared on first use.
    pub(crate) fn expr(&mut self, expr: &Arc<Expr>) -> Ident {
        if let Some((_, ident)) = self.exprs.iter().find(|(known, _)| known == expr) {
            return ident.clone();
        }
        let construction = self.construct(expr);
        let ident = format_ident!("EXPR_{}", self.exprs.len());
        self.items.push(quote! {
            static #ident: LazyLock<Arc<Expr>> = LazyLock::new(|| #construction);
        });
        self.exprs.push((expr.clone(), ident.clone()));
        ident
    }

    fn construct(&mut self, expr: &Arc<Expr>) -> TokenStream {
        match expr.as_ref() {
            Expr::Operation { head, args } => {
                let head = self.head(head);
                let args: Vec<TokenStream> = args.iter().map(|arg| self.construct(arg)).collect();
                quote! { Expr::operation(#head.clone(), [#(#args),*]) }
            }
            _ => atom(expr),
        }
    }
}

/// Expression constructing `expr` from the names a generated module imports.
///
/// Heads are built in place instead of through the module's `static` items.
pub fn construct_expr(expr: &Arc<Expr>) -> TokenStream {
    match expr.as_ref() {
        Expr::Operation { head, args } => {
            let name = head.name();
            let kind = format_ident!("{}", op_kind(head.kind()));
            let args = args.iter().map(construct_expr);
            quote! { Expr::operation(Head::from_static(#name, OpKind::#kind), [#(#args),*]) }
        }
        _ => atom(expr),
    }
}

fn atom(expr: &Expr) -> TokenStream {
    match expr {
        Expr::Integer(value) if *value < 0 => {
            let magnitude = Literal::u64_unsuffixed(value.unsigned_abs());
            quote! { Expr::integer(-#magnitude) }
        }
        Expr::Integer(value) => {
            let value = Literal::i64_unsuffixed(*value);
            quote! { Expr::integer(#value) }
        }
        Expr::Symbol(symbol) => {
            let name = symbol.name();
            let kind = format_ident!("{}", symbol.kind().to_string());
            quote! { Expr::symbol_of(#name, SymbolKind::#kind) }
        }
        Expr::Operation { .. } => unreachable!("operations are built by construct_expr"),
    }
}

/// What state functions of one automaton refer to.
pub(crate) struct Scope<'a> {
    pub(crate) automaton: &'a Automaton,
    pub(crate) prefix: Ident,
    /// Type names of the automaton's sub-matchers, by matcher index.
    pub(crate) matchers: Vec<Ident>,
}

impl Scope<'_> {
    pub(crate) fn state_function(&self, id: StateId) -> Ident {
        format_ident!("{}_{}", self.prefix, id.to_string())
    }
}

fn is_reserved(name: &str) -> bool {
    name == "match_commutative" || RESERVED_PREFIXES.iter().any(|prefix| name.starts_with(prefix))
}

/// Unsuffixed `usize` literal.
pub(crate) fn index(value: usize) -> Literal {
    Literal::usize_unsuffixed(value)
}

fn op_kind(kind: OpKind) -> &'static str {
    match kind {
        OpKind::Plain => "Plain",
        OpKind::Associative => "Associative",
        OpKind::Commutative => "Commutative",
        OpKind::AssociativeCommutative => "AssociativeCommutative",
    }
}

// ============================================================================
// OUTPUT
// ============================================================================

/// Validated source of a generated matcher module.
#[derive(Debug, Clone)]
pub struct GeneratedCode {
    function: String,
    pattern_count: usize,
    matcher_count: usize,
    file: syn::File,
}

impl GeneratedCode {
    /// Name of the public entry point.
    pub fn function(&self) -> &str {
        &self.function
    }

    pub fn pattern_count(&self) -> usize {
        self.pattern_count
    }

    /// Number of emitted `CommutativeMatcherN` types, nested ones included.
    pub fn matcher_count(&self) -> usize {
        self.matcher_count
    }

    pub fn file(&self) -> &syn::File {
        &self.file
    }

    pub fn tokens(&self) -> TokenStream {
        self.file.to_token_stream()
    }
}

impl fmt::Display for GeneratedCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tokens())
    }
}
