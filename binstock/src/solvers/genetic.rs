use std::time::{Duration, Instant};

use itertools::Itertools;
use log::{debug, info};
use rand::Rng;
use rand::seq::SliceRandom;
use rayon::prelude::*;

use crate::entities::{BPInstance, BPSolution, SolveStatus};
use crate::error::{Result, SolveError};
use crate::solvers::ffd;
use crate::util::GAConfig;
use crate::util::assertions::{bins_partition_items, bins_within_capacity};

/// Result of a genetic algorithm run.
#[derive(Debug, Clone)]
pub struct GAOutcome {
    pub solution: BPSolution,
    /// Fitness (number of bins) of the best individual, for the initial population and every generation after it
    pub best_per_generation: Vec<usize>,
}

#[derive(Debug, Clone)]
struct Individual {
    chromosome: Vec<usize>,
    fitness: usize,
}

/// Evolves orderings of the items, evaluated with first-fit.
///
/// A chromosome is a sequence of item ids. Crossover and mutation can duplicate or drop ids,
/// so chromosomes are decoded before evaluation, see [`decode`].
/// At least one elite is kept every generation, making the best fitness non-increasing.
pub fn solve(instance: &BPInstance, config: &GAConfig, rng: &mut impl Rng) -> Result<GAOutcome> {
    instance.validate()?;
    if config.population_size == 0 {
        return Err(SolveError::InvalidInstance(
            "the population should contain at least one individual".into(),
        ));
    }
    let start = Instant::now();
    let n_items = instance.n_items();

    if n_items == 0 {
        return Ok(GAOutcome {
            solution: BPSolution::new(vec![], SolveStatus::Optimal),
            best_per_generation: vec![0],
        });
    }

    let time_limit = config.time_limit_ms.map(Duration::from_millis);
    let n_elites = config.elite_count.clamp(1, config.population_size);
    let crossover_rate = config.crossover_rate.clamp(0.0, 1.0);

    let mut population = (0..config.population_size)
        .map(|_| {
            let mut chromosome = (0..n_items).collect_vec();
            chromosome.shuffle(rng);
            Individual {
                chromosome,
                fitness: usize::MAX,
            }
        })
        .collect_vec();
    evaluate(instance, &mut population);
    population.sort_by_key(|ind| ind.fitness);

    let mut best = population[0].fitness;
    let mut history = vec![best];
    let mut stagnant = 0;
    debug!("[GA] initial population, best: {best} bins");

    for generation in 1..=config.generations {
        if time_limit.is_some_and(|limit| start.elapsed() >= limit) {
            debug!("[GA] time limit reached at generation {generation}");
            break;
        }

        let parent_pool = config.parent_pool.clamp(1, population.len());
        let mut next = population[..n_elites].to_vec();
        while next.len() < config.population_size {
            if rng.random_bool(crossover_rate) {
                let a = &population[rng.random_range(0..parent_pool)];
                let b = &population[rng.random_range(0..parent_pool)];
                let (mut c1, mut c2) = crossover(&a.chromosome, &b.chromosome, rng);
                mutate(&mut c1, n_items, rng);
                mutate(&mut c2, n_items, rng);
                next.extend([c1, c2].map(|chromosome| Individual {
                    chromosome,
                    fitness: usize::MAX,
                }));
            } else {
                let mut chromosome = population[rng.random_range(0..population.len())]
                    .chromosome
                    .clone();
                mutate(&mut chromosome, n_items, rng);
                next.push(Individual {
                    chromosome,
                    fitness: usize::MAX,
                });
            }
        }
        next.truncate(config.population_size);
        evaluate(instance, &mut next[n_elites..]);
        next.sort_by_key(|ind| ind.fitness);
        population = next;

        let generation_best = population[0].fitness;
        history.push(generation_best);
        if generation_best < best {
            debug!("[GA] generation {generation}: improved to {generation_best} bins");
            best = generation_best;
            stagnant = 0;
        } else {
            stagnant += 1;
        }

        if let Some(limit) = config.stagnation_limit {
            if stagnant >= limit {
                debug!("[GA] no improvement for {stagnant} generations, stopping at generation {generation}");
                break;
            }
        }
    }

    let order = decode(&population[0].chromosome, n_items);
    let bins = ffd::first_fit(instance, order);

    debug_assert!(bins_partition_items(instance, &bins));
    debug_assert!(bins_within_capacity(instance, &bins));
    debug_assert_eq!(bins.len(), best);

    let status = match bins.len() == instance.lower_bound() {
        true => SolveStatus::Optimal,
        false => SolveStatus::Heuristic,
    };

    info!(
        "[GA] {} bins (lower bound: {}) after {} generations in {:.3}ms",
        bins.len(),
        instance.lower_bound(),
        history.len() - 1,
        start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(GAOutcome {
        solution: BPSolution::new(bins, status),
        best_per_generation: history,
    })
}

fn evaluate(instance: &BPInstance, individuals: &mut [Individual]) {
    individuals.par_iter_mut().for_each(|ind| {
        let order = decode(&ind.chromosome, instance.n_items());
        ind.fitness = ffd::first_fit_count(instance, order);
    });
}

/// Turns a chromosome into a permutation of `0..n_items`:
/// the first occurrence of every id is kept, ids that do not occur are appended in increasing order.
pub fn decode(chromosome: &[usize], n_items: usize) -> Vec<usize> {
    let mut seen = vec![false; n_items];
    let mut order = Vec::with_capacity(n_items);
    for &id in chromosome {
        if id < n_items && !seen[id] {
            seen[id] = true;
            order.push(id);
        }
    }
    order.extend((0..n_items).filter(|&id| !seen[id]));
    order
}

/// Single-point crossover, the cut index is uniform in `[1, len - 1]`.
fn crossover(a: &[usize], b: &[usize], rng: &mut impl Rng) -> (Vec<usize>, Vec<usize>) {
    let len = a.len().min(b.len());
    if len < 2 {
        return (a.to_vec(), b.to_vec());
    }
    let cut = rng.random_range(1..len);
    let c1 = a[..cut].iter().chain(&b[cut..]).copied().collect_vec();
    let c2 = b[..cut].iter().chain(&a[cut..]).copied().collect_vec();
    (c1, c2)
}

/// Replaces a random gene with a random item id.
fn mutate(chromosome: &mut [usize], n_items: usize, rng: &mut impl Rng) {
    if chromosome.is_empty() || n_items == 0 {
        return;
    }
    let gene = rng.random_range(0..chromosome.len());
    chromosome[gene] = rng.random_range(0..n_items);
}
