use {
    crate::common::{FieldsExt, TranscodeArgs, get_crate_name},
    darling::{Error, FromDeriveInput, Result, ast::Data},
    proc_macro2::TokenStream,
    quote::quote,
    syn::{DeriveInput, parse_quote},
};

pub(crate) fn generate(input: DeriveInput) -> Result<TokenStream> {
    let args = TranscodeArgs::from_derive_input(&input)?;
    let crate_name = get_crate_name(&args);
    let Data::Struct(fields) = &args.data else {
        return Err(Error::custom("`Transcode` can only be derived for structs").with_span(&input));
    };

    let mut generics = args.generics.clone();
    for param in generics.type_params_mut() {
        param
            .bounds
            .push(parse_quote!(#crate_name::persist::Transcode));
    }
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let ident = &args.ident;

    let members = fields.struct_member_ident_iter();
    let body = if fields.is_empty() {
        quote! { let _ = ctx; }
    } else {
        quote! { #( ctx.transcode(&mut self.#members)?; )* }
    };

    Ok(quote! {
        impl #impl_generics #crate_name::persist::Transcode for #ident #ty_generics #where_clause {
            #[inline]
            fn transcode(
                &mut self,
                ctx: &mut #crate_name::persist::PersistContext<'_>,
            ) -> #crate_name::error::PersistResult<()> {
                #body
                Ok(())
            }
        }
    })
}
