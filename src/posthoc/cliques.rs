/// Enumerate the maximal cliques of an undirected graph.
///
/// The graph is given as a symmetric adjacency matrix without self-loops.
/// Isolated nodes form singleton cliques, so every node appears in at
/// least one clique. Members of each clique are returned ascending and
/// the clique list is sorted lexicographically, so identical graphs always
/// produce identical output.
///
/// Uses Bron-Kerbosch with pivoting, which is plenty for the graph sizes
/// arising from treatment comparisons (tens of nodes).
pub fn maximal_cliques(adjacency: &[Vec<bool>]) -> Vec<Vec<usize>> {
    let n = adjacency.len();
    let mut cliques = Vec::new();
    let mut current = Vec::new();
    let candidates: Vec<usize> = (0..n).collect();
    bron_kerbosch(adjacency, &mut current, candidates, Vec::new(), &mut cliques);

    for clique in &mut cliques {
        clique.sort_unstable();
    }
    cliques.sort();
    cliques
}

/// Recursive Bron-Kerbosch step over candidate set P and exclusion set X.
fn bron_kerbosch(
    adjacency: &[Vec<bool>],
    current: &mut Vec<usize>,
    mut candidates: Vec<usize>,
    mut excluded: Vec<usize>,
    cliques: &mut Vec<Vec<usize>>,
) {
    if candidates.is_empty() && excluded.is_empty() {
        cliques.push(current.clone());
        return;
    }

    // Pivot on the node covering the most candidates; only its
    // non-neighbours need to be branched on.
    let pivot = candidates
        .iter()
        .chain(excluded.iter())
        .copied()
        .max_by_key(|&u| candidates.iter().filter(|&&v| adjacency[u][v]).count())
        .unwrap_or(0);
    let branch: Vec<usize> = candidates
        .iter()
        .copied()
        .filter(|&v| !adjacency[pivot][v])
        .collect();

    for v in branch {
        current.push(v);
        let next_candidates: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|&u| adjacency[v][u])
            .collect();
        let next_excluded: Vec<usize> = excluded
            .iter()
            .copied()
            .filter(|&u| adjacency[v][u])
            .collect();
        bron_kerbosch(adjacency, current, next_candidates, next_excluded, cliques);
        current.pop();
        candidates.retain(|&u| u != v);
        excluded.push(v);
    }
}
