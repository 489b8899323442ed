//! Elixir Term Conversion Utilities
//!
//! Converts records to Elixir terms. Records become maps with atom keys;
//! keyed lists become maps from binary (or `nil`) keys to lists.

use rustler::{Encoder, Env, NewBinary, NifResult, Term};

use crate::mapping::{
    Character, DictionaryRef, Header, KeyedList, KeyedScalar, Output, QueryCode, Record,
};

// Pre-defined atoms for efficiency - created once at compile time
rustler::atoms! {
    ok,
    error,
    backpressure,
    kind,
    header,
    character,
    file_version,
    database_year,
    version_in_year,
    creation_year,
    creation_month,
    creation_day,
    literal,
    codepoints,
    radicals,
    grade,
    stroke_counts,
    variants,
    freq,
    radical_names,
    jlpt,
    dictionary_refs,
    query_codes,
    readings,
    meanings,
    nanori,
    volume,
    page,
    value,
    misclass,
}

/// Convert a string to a binary term (more efficient than .encode())
#[inline]
fn str_to_binary<'a>(env: Env<'a>, s: &str) -> Term<'a> {
    let bytes = s.as_bytes();
    let mut binary = NewBinary::new(env, bytes.len());
    binary.as_mut_slice().copy_from_slice(bytes);
    binary.into()
}

fn opt_to_term<'a, T: Encoder>(env: Env<'a>, v: Option<T>) -> Term<'a> {
    match v {
        Some(v) => v.encode(env),
        None => rustler::types::atom::nil().encode(env),
    }
}

fn opt_str_to_term<'a>(env: Env<'a>, s: Option<&str>) -> Term<'a> {
    match s {
        Some(s) => str_to_binary(env, s),
        None => rustler::types::atom::nil().encode(env),
    }
}

fn strings_to_list<'a>(env: Env<'a>, items: &[String]) -> Term<'a> {
    let mut list = Term::list_new_empty(env);
    for s in items.iter().rev() {
        list = list.list_prepend(str_to_binary(env, s));
    }
    list
}

fn keyed_list_to_term<'a, V>(
    env: Env<'a>,
    keyed: &KeyedList<V>,
    convert: impl Fn(Env<'a>, &V) -> NifResult<Term<'a>>,
) -> NifResult<Term<'a>> {
    let mut pairs = Vec::with_capacity(keyed.len());
    for (key, values) in keyed.iter() {
        let mut list = Term::list_new_empty(env);
        for v in values.iter().rev() {
            list = list.list_prepend(convert(env, v)?);
        }
        pairs.push((opt_str_to_term(env, key), list));
    }
    Term::map_from_pairs(env, &pairs)
}

fn keyed_scalar_to_term<'a, V>(
    env: Env<'a>,
    keyed: &KeyedScalar<V>,
    convert: impl Fn(Env<'a>, &V) -> Term<'a>,
) -> NifResult<Term<'a>> {
    let pairs: Vec<(Term<'a>, Term<'a>)> = keyed
        .iter()
        .map(|(key, v)| (opt_str_to_term(env, key), convert(env, v)))
        .collect();
    Term::map_from_pairs(env, &pairs)
}

fn dictionary_ref_to_term<'a>(env: Env<'a>, r: &DictionaryRef) -> NifResult<Term<'a>> {
    match r {
        DictionaryRef::Plain(v) => Ok(str_to_binary(env, v)),
        DictionaryRef::Moro(moro) => Term::map_from_pairs(
            env,
            &[
                (volume().encode(env), opt_str_to_term(env, moro.volume.as_deref())),
                (page().encode(env), opt_str_to_term(env, moro.page.as_deref())),
                (value().encode(env), str_to_binary(env, &moro.value)),
            ],
        ),
    }
}

fn query_code_to_term<'a>(env: Env<'a>, q: &QueryCode) -> NifResult<Term<'a>> {
    match q {
        QueryCode::Plain(v) => Ok(str_to_binary(env, v)),
        QueryCode::Skip(skip) => Term::map_from_pairs(
            env,
            &[
                (
                    misclass().encode(env),
                    opt_str_to_term(env, skip.misclass.as_ref().map(|m| m.as_str())),
                ),
                (value().encode(env), str_to_binary(env, &skip.value)),
            ],
        ),
    }
}

fn header_to_term<'a>(env: Env<'a>, h: &Header) -> NifResult<Term<'a>> {
    Term::map_from_pairs(
        env,
        &[
            (kind().encode(env), header().encode(env)),
            (file_version().encode(env), opt_to_term(env, h.file_version)),
            (database_year().encode(env), opt_to_term(env, h.database_year)),
            (version_in_year().encode(env), opt_to_term(env, h.version_in_year)),
            (creation_year().encode(env), opt_to_term(env, h.creation_year)),
            (creation_month().encode(env), opt_to_term(env, h.creation_month)),
            (creation_day().encode(env), opt_to_term(env, h.creation_day)),
        ],
    )
}

fn character_to_term<'a>(env: Env<'a>, c: &Character) -> NifResult<Term<'a>> {
    let plain = |env: Env<'a>, s: &String| -> NifResult<Term<'a>> { Ok(str_to_binary(env, s)) };
    Term::map_from_pairs(
        env,
        &[
            (kind().encode(env), character().encode(env)),
            (literal().encode(env), str_to_binary(env, &c.literal)),
            (
                codepoints().encode(env),
                keyed_scalar_to_term(env, &c.codepoints, |env, s| str_to_binary(env, s))?,
            ),
            (
                radicals().encode(env),
                keyed_scalar_to_term(env, &c.radicals, |env, n| n.encode(env))?,
            ),
            (grade().encode(env), opt_to_term(env, c.grade)),
            (stroke_counts().encode(env), c.stroke_counts.encode(env)),
            (variants().encode(env), keyed_list_to_term(env, &c.variants, plain)?),
            (freq().encode(env), opt_to_term(env, c.freq)),
            (radical_names().encode(env), strings_to_list(env, &c.radical_names)),
            (jlpt().encode(env), opt_to_term(env, c.jlpt)),
            (
                dictionary_refs().encode(env),
                keyed_list_to_term(env, &c.dictionary_refs, dictionary_ref_to_term)?,
            ),
            (
                query_codes().encode(env),
                keyed_list_to_term(env, &c.query_codes, query_code_to_term)?,
            ),
            (readings().encode(env), keyed_list_to_term(env, &c.readings, plain)?),
            (meanings().encode(env), keyed_list_to_term(env, &c.meanings, plain)?),
            (nanori().encode(env), strings_to_list(env, &c.nanori)),
        ],
    )
}

/// Convert a record to an Elixir map
pub fn record_to_term<'a>(env: Env<'a>, record: &Record) -> NifResult<Term<'a>> {
    match record {
        Record::Header(h) => header_to_term(env, h),
        Record::Character(c) => character_to_term(env, c),
    }
}

/// Convert one output to `{:ok, record}` or `{:error, message}`
pub fn output_to_term<'a>(env: Env<'a>, output: &Output) -> NifResult<Term<'a>> {
    Ok(match output {
        Ok(record) => (ok(), record_to_term(env, record)?).encode(env),
        Err(e) => (error(), str_to_binary(env, &e.to_string())).encode(env),
    })
}

/// Convert outputs to an Elixir list, preserving order
pub fn outputs_to_term<'a>(env: Env<'a>, outputs: &[Output]) -> NifResult<Term<'a>> {
    let mut list = Term::list_new_empty(env);
    for output in outputs.iter().rev() {
        list = list.list_prepend(output_to_term(env, output)?);
    }
    Ok(list)
}
