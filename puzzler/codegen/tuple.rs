use {
    proc_macro2::{Ident, Literal, Span},
    quote::quote,
    std::io::{Result, Write},
};

/// Generate `Transcode` implementations for tuples of arity 2 up to `arity`.
///
/// Elements are transcoded in positional order, so a pair `(A, B)` is `A`'s encoding followed
/// immediately by `B`'s.
pub fn generate(arity: usize, mut out: impl Write) -> Result<()> {
    assert!(arity > 1 && arity <= 26, "arity must be > 1 and <= 26");

    for arity in 2..=arity {
        let params: Vec<_> = ('A'..='Z')
            .take(arity)
            .map(|c| Ident::new(&c.to_string(), Span::call_site()))
            .collect();
        let idxs: Vec<_> = (0..arity).map(Literal::usize_unsuffixed).collect();

        let stream = quote! {
            impl<#(#params),*> crate::persist::Transcode for ( #(#params),* )
            where
                #(#params: crate::persist::Transcode,)*
            {
                #[inline]
                fn transcode(
                    &mut self,
                    ctx: &mut crate::persist::PersistContext<'_>,
                ) -> crate::PersistResult<()> {
                    #( crate::persist::Transcode::transcode(&mut self.#idxs, ctx)?; )*
                    Ok(())
                }
            }
        };

        write!(out, "{stream}")?;
    }

    Ok(())
}
