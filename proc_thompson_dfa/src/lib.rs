use proc_macro2::{Literal, TokenStream};
use quote::{quote, ToTokens};
use std::collections::BTreeMap;
use syn::{parse_macro_input, LitStr};
use thompson_dfa_transformer::{compile, Automaton, StateId};

/// Compiles an expression to a DFA during compilation.
///
/// `dfa!("(a|b)*c")` expands to a `thompson_dfa_util::TableDfa` constant, so
/// `dfa!("(a|b)*c").test(word)` can be called from a `const fn`. A malformed
/// expression is a compile error.
#[proc_macro]
pub fn dfa(input: proc_macro::TokenStream) -> proc_macro::TokenStream {
    let literal = parse_macro_input!(input as LitStr);

    match compile(&literal.value()) {
        Ok(compiled) => Table::new(compiled.dfa()).into_token_stream().into(),
        Err(e) => syn::Error::new(literal.span(), format!("invalid expression: {e}"))
            .to_compile_error()
            .into(),
    }
}

struct Table {
    initial: usize,
    accepting: Vec<bool>,
    rows: Vec<Row>,
}

impl Table {
    /// Lays the states out in label order.
    fn new(dfa: &Automaton) -> Self {
        let index: BTreeMap<StateId, usize> = dfa.states().iter().enumerate().map(|(i, s)| (*s, i)).collect();

        let mut rows: Vec<Row> = dfa.states().iter().map(|_| Row::default()).collect();
        for t in dfa.transitions() {
            if let Some(c) = t.symbol.as_char() {
                rows[index[&t.source]].moves.push((c as u8, index[&t.destination]));
            }
        }

        Table {
            initial: index[dfa.initial()],
            accepting: dfa.states().iter().map(|s| dfa.is_accepting(*s)).collect(),
            rows,
        }
    }
}

impl ToTokens for Table {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let initial = Literal::usize_suffixed(self.initial);
        let accepting = &self.accepting;
        let rows = &self.rows;

        tokens.extend(quote! {
            {
                const TABLE: ::thompson_dfa_util::TableDfa<'static> = ::thompson_dfa_util::TableDfa::new(
                    #initial,
                    &[#(#accepting),*],
                    &[#(#rows),*],
                );
                TABLE
            }
        });
    }
}

#[derive(Default)]
struct Row {
    moves: Vec<(u8, usize)>,
}

impl ToTokens for Row {
    fn to_tokens(&self, tokens: &mut TokenStream) {
        let symbols = self.moves.iter().map(|(c, _)| Literal::u8_suffixed(*c));
        let destinations = self.moves.iter().map(|(_, d)| Literal::usize_suffixed(*d));

        tokens.extend(quote! {
            &[#((#symbols, #destinations)),*] as &[(u8, usize)]
        });
    }
}
