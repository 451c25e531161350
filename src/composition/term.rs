use std::fmt;

use serde::{Deserialize, Serialize};

use crate::theory::{render_objects, Compartment, Generator};
use crate::utils::errors::SimulationError;

/// A morphism expression in the free hypergraph category over the
/// epidemiology theory.  Besides the generators, the structure maps (copy,
/// merge, create, delete, braid) let a wire feed several processes, or
/// several processes feed one compartment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Term {
    Generator(Generator),
    Id(Vec<Compartment>),
    /// Sequential composition, in diagram order (`f ⋅ g` is f then g)
    Compose(Vec<Term>),
    /// Parallel composition (monoidal product)
    Otimes(Vec<Term>),
    Braid(Compartment, Compartment),
    /// `a → a ⊗ a`
    Mcopy(Compartment),
    /// `a ⊗ a → a`
    Mmerge(Compartment),
    /// `I₀ → a`
    Create(Compartment),
    /// `a → I₀`
    Delete(Compartment),
}

impl Term {
    pub fn generator(generator: Generator) -> Self {
        Term::Generator(generator)
    }

    pub fn id(objects: &[Compartment]) -> Self {
        Term::Id(objects.to_vec())
    }

    /// Type check the term, returning its domain and codomain.
    pub fn signature(&self) -> Result<(Vec<Compartment>, Vec<Compartment>), SimulationError> {
        match self {
            Term::Generator(generator) => Ok((generator.dom(), generator.cod())),
            Term::Id(objects) => Ok((objects.clone(), objects.clone())),
            Term::Compose(terms) => {
                let mut signatures = terms.iter().map(Term::signature);
                let (dom, mut cod) = match signatures.next() {
                    Some(signature) => signature?,
                    None => return Ok((Vec::new(), Vec::new())),
                };
                for signature in signatures {
                    let (next_dom, next_cod) = signature?;
                    if cod != next_dom {
                        return Err(SimulationError::ArityMismatch {
                            codomain: render_objects(&cod),
                            domain: render_objects(&next_dom),
                        });
                    }
                    cod = next_cod;
                }
                Ok((dom, cod))
            }
            Term::Otimes(terms) => terms.iter().try_fold(
                (Vec::new(), Vec::new()),
                |(mut dom, mut cod), term| -> Result<_, SimulationError> {
                    let (term_dom, term_cod) = term.signature()?;
                    dom.extend(term_dom);
                    cod.extend(term_cod);
                    Ok((dom, cod))
                },
            ),
            Term::Braid(a, b) => Ok((vec![*a, *b], vec![*b, *a])),
            Term::Mcopy(a) => Ok((vec![*a], vec![*a, *a])),
            Term::Mmerge(a) => Ok((vec![*a, *a], vec![*a])),
            Term::Create(a) => Ok((Vec::new(), vec![*a])),
            Term::Delete(a) => Ok((vec![*a], Vec::new())),
        }
    }

    pub fn dom(&self) -> Result<Vec<Compartment>, SimulationError> {
        Ok(self.signature()?.0)
    }

    pub fn cod(&self) -> Result<Vec<Compartment>, SimulationError> {
        Ok(self.signature()?.1)
    }

    /// Checked sequential composition, `self ⋅ next`.
    pub fn then(self, next: Term) -> Result<Term, SimulationError> {
        let cod = self.cod()?;
        let dom = next.dom()?;
        if cod != dom {
            return Err(SimulationError::ArityMismatch {
                codomain: render_objects(&cod),
                domain: render_objects(&dom),
            });
        }
        let mut terms = match self {
            Term::Compose(terms) => terms,
            term => vec![term],
        };
        match next {
            Term::Compose(next_terms) => terms.extend(next_terms),
            term => terms.push(term),
        }
        Ok(Term::Compose(terms))
    }

    /// Checked parallel composition, `self ⊗ other`.
    pub fn otimes(self, other: Term) -> Result<Term, SimulationError> {
        self.signature()?;
        other.signature()?;
        let mut terms = match self {
            Term::Otimes(terms) => terms,
            term => vec![term],
        };
        match other {
            Term::Otimes(other_terms) => terms.extend(other_terms),
            term => terms.push(term),
        }
        Ok(Term::Otimes(terms))
    }

    /// `transmission ⋅ recovery : S⊗I → R`
    pub fn sir() -> Self {
        Term::Compose(vec![
            Term::Generator(Generator::Transmission),
            Term::Generator(Generator::Recovery),
        ])
    }

    /// Exposure feeds an incubation stage, and the newly ill merge with the
    /// already infected before recovery: `S⊗I → R`.
    pub fn seir() -> Self {
        Term::Compose(vec![
            Term::Otimes(vec![Term::Id(vec![Compartment::S]), Term::Mcopy(Compartment::I)]),
            Term::Otimes(vec![
                Term::Generator(Generator::Exposure),
                Term::Id(vec![Compartment::I]),
            ]),
            Term::Otimes(vec![
                Term::Generator(Generator::Illness),
                Term::Id(vec![Compartment::I]),
            ]),
            Term::Mmerge(Compartment::I),
            Term::Generator(Generator::Recovery),
        ])
    }

    /// SEIR with a competing death outcome: `S⊗I → R⊗D`.
    pub fn seird() -> Self {
        Term::Compose(vec![
            Term::Otimes(vec![Term::Id(vec![Compartment::S]), Term::Mcopy(Compartment::I)]),
            Term::Otimes(vec![
                Term::Generator(Generator::Exposure),
                Term::Id(vec![Compartment::I]),
            ]),
            Term::Otimes(vec![
                Term::Generator(Generator::Illness),
                Term::Id(vec![Compartment::I]),
            ]),
            Term::Mmerge(Compartment::I),
            Term::Mcopy(Compartment::I),
            Term::Otimes(vec![
                Term::Generator(Generator::Recovery),
                Term::Generator(Generator::Death),
            ]),
        ])
    }
}

impl From<Generator> for Term {
    fn from(generator: Generator) -> Self {
        Term::Generator(generator)
    }
}

fn join(f: &mut fmt::Formatter<'_>, terms: &[Term], separator: &str) -> fmt::Result {
    write!(f, "(")?;
    for (index, term) in terms.iter().enumerate() {
        if index > 0 {
            write!(f, " {} ", separator)?;
        }
        write!(f, "{}", term)?;
    }
    write!(f, ")")
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Generator(generator) => write!(f, "{}", generator),
            Term::Id(objects) => write!(f, "id({})", render_objects(objects)),
            Term::Compose(terms) => join(f, terms, "⋅"),
            Term::Otimes(terms) => join(f, terms, "⊗"),
            Term::Braid(a, b) => write!(f, "σ({},{})", a, b),
            Term::Mcopy(a) => write!(f, "Δ({})", a),
            Term::Mmerge(a) => write!(f, "∇({})", a),
            Term::Create(a) => write!(f, "□({})", a),
            Term::Delete(a) => write!(f, "◊({})", a),
        }
    }
}
