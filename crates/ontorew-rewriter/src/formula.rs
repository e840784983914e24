//! Tree-witness formula assembly.
//!
//! For a maximal set of pairwise-compatible, post-merge witnesses selected for
//! one rewriting attempt, each witness contributes a disjunction with one
//! conjunction per generator, stating that the generator's role/concept pair
//! holds of the attachment terms. The formula for the whole combination is the
//! conjunction of the per-witness disjunctions, distributed back into DNF so
//! the driver can inject each conjunct list as a plain CQ body.

use crate::witness::TreeWitness;
use ontorew_model::{Atom, ConjunctiveQuery, VariableGenerator};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A disjunction of conjunctions of atoms. Disjunct order carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewritingFormula {
    pub conjunctions: Vec<Vec<Atom>>,
}

impl RewritingFormula {
    pub fn new(conjunctions: Vec<Vec<Atom>>) -> Self {
        RewritingFormula { conjunctions }
    }
}

/// Output of one assembly: the combined formula, the atoms it discharges, and
/// the root atoms that survive as ordinary conjuncts.
#[derive(Debug, Clone)]
pub struct AssembledRewriting {
    pub formula: RewritingFormula,
    pub discharged_atoms: BTreeSet<Atom>,
    pub root_atoms: BTreeSet<Atom>,
}

pub struct FormulaAssembler;

impl FormulaAssembler {
    /// The disjunction a single witness contributes: one conjunction per
    /// generator `∃R.B`, each asserting `R(r, w) ∧ B(w)` for every root `r`,
    /// with `w` a fresh variable private to the witness.
    fn witness_formula(witness: &TreeWitness, vargen: &mut VariableGenerator) -> RewritingFormula {
        let fresh = vargen.fresh();
        let conjunctions = witness
            .generators()
            .iter()
            .map(|g| {
                let mut conj = Vec::new();
                for root in witness.cover().roots() {
                    let atom = if g.role.inverse {
                        Atom::role(&g.role.name, fresh.clone(), root.clone())
                    } else {
                        Atom::role(&g.role.name, root.clone(), fresh.clone())
                    };
                    conj.push(atom);
                }
                conj.push(Atom::class(&g.filler.name, fresh.clone()));
                conj
            })
            .collect();
        RewritingFormula::new(conjunctions)
    }

    /// Assembles the formula for a compatible witness combination, attaching
    /// each witness's own formula along the way (exactly once per witness).
    ///
    /// No discharged tree-part atom appears in the output as a literal; it is
    /// represented purely through the formula.
    pub fn assemble(
        witnesses: &mut [TreeWitness],
        query: &ConjunctiveQuery,
        vargen: &mut VariableGenerator,
    ) -> AssembledRewriting {
        let mut discharged_atoms = BTreeSet::new();
        let mut root_atoms = BTreeSet::new();

        // Conjunction across witnesses of per-witness disjunctions,
        // distributed into DNF.
        let mut dnf: Vec<Vec<Atom>> = vec![Vec::new()];
        for witness in witnesses.iter_mut() {
            let formula = Self::witness_formula(witness, vargen);
            dnf = dnf
                .iter()
                .flat_map(|prefix| {
                    formula.conjunctions.iter().map(|conj| {
                        let mut extended = prefix.clone();
                        extended.extend(conj.iter().cloned());
                        extended
                    })
                })
                .collect();
            discharged_atoms.extend(witness.tree_part_of(query));
            root_atoms.extend(witness.root_atoms().iter().cloned());
            witness.set_formula(formula);
        }

        AssembledRewriting {
            formula: RewritingFormula::new(dnf),
            discharged_atoms,
            root_atoms,
        }
    }
}
